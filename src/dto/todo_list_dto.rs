use serde::Deserialize;

use crate::dto::{max_length, required, FormErrors, Validated};

pub const TITLE_MAX_LEN: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ToDoListForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Title and content that passed validation.
#[derive(Debug, PartialEq)]
pub struct ListDraft {
    pub title: String,
    pub content: String,
}

impl ToDoListForm {
    pub fn validate(&self) -> Validated<ListDraft> {
        let mut errors = FormErrors::default();
        if required(&mut errors, "title", &self.title) {
            max_length(&mut errors, "title", &self.title, TITLE_MAX_LEN);
        }
        required(&mut errors, "content", &self.content);

        Validated::check(errors, || ListDraft {
            title: self.title.clone(),
            content: self.content.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_fields_are_required() {
        let Validated::Invalid(errors) = ToDoListForm::default().validate() else {
            panic!("empty form validated");
        };

        assert_eq!(errors.field("title").len(), 1);
        assert_eq!(errors.field("content").len(), 1);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let form = ToDoListForm {
            title: "x".repeat(TITLE_MAX_LEN + 1),
            content: "milk".into(),
        };

        assert!(matches!(form.validate(), Validated::Invalid(_)));
    }

    #[test]
    fn valid_form_yields_draft() {
        let form = ToDoListForm {
            title: "Groceries".into(),
            content: "milk, eggs".into(),
        };

        let Validated::Valid(draft) = form.validate() else {
            panic!("valid form rejected");
        };
        assert_eq!(draft.title, "Groceries");
        assert_eq!(draft.content, "milk, eggs");
    }
}
