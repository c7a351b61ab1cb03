use serde::{Deserialize, Serialize};

/// Position in the three-step form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    AboutForm,
    CompleteForm,
    Receipt,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::AboutForm, Step::CompleteForm, Step::Receipt];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The following step; `Receipt` is terminal.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(self)
    }

    /// The preceding step; `AboutForm` has none.
    pub fn previous(self) -> Self {
        match self.index().checked_sub(1) {
            Some(index) => Self::from_index(index).unwrap_or(self),
            None => self,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Receipt
    }
}

/// How the form page was opened (`mode=new|edit|view`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageType {
    New,
    Edit,
    View,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::New => "new",
            PageType::Edit => "edit",
            PageType::View => "view",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Some(PageType::New),
            "edit" => Some(PageType::Edit),
            "view" => Some(PageType::View),
            _ => None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, PageType::View)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        assert_eq!(Step::AboutForm.index(), 0);
        assert_eq!(Step::CompleteForm.index(), 1);
        assert_eq!(Step::Receipt.index(), 2);
        assert_eq!(Step::from_index(1), Some(Step::CompleteForm));
        assert_eq!(Step::from_index(3), None);
    }

    #[test]
    fn next_stops_at_receipt() {
        let step = Step::AboutForm.next().next().next();

        assert_eq!(step, Step::Receipt);
        assert_eq!(step.index(), 2);
    }

    #[test]
    fn previous_stops_at_about() {
        assert_eq!(Step::CompleteForm.previous(), Step::AboutForm);
        assert_eq!(Step::AboutForm.previous(), Step::AboutForm);
    }

    #[test]
    fn page_type_parses_mode_values() {
        assert_eq!(PageType::parse("new"), Some(PageType::New));
        assert_eq!(PageType::parse("EDIT"), Some(PageType::Edit));
        assert_eq!(PageType::parse(" view "), Some(PageType::View));
        assert_eq!(PageType::parse("delete"), None);
    }

    #[test]
    fn page_type_round_trips_through_as_str() {
        for page_type in [PageType::New, PageType::Edit, PageType::View] {
            assert_eq!(PageType::parse(page_type.as_str()), Some(page_type));
        }
    }
}
