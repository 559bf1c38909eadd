use serde::Serialize;
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

/// Field name -> messages, rendered next to the offending inputs.
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FormErrors::default();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                out.add(&field.to_string(), message);
            }
        }
        out
    }
}

/// What a template sees as `form`: the submitted values plus any errors.
#[derive(Serialize, Debug)]
pub struct BoundForm<T: Serialize> {
    pub data: T,
    pub errors: FormErrors,
    pub is_bound: bool,
}

impl<T: Serialize> BoundForm<T> {
    pub fn unbound(data: T) -> Self {
        Self { data, errors: FormErrors::default(), is_bound: false }
    }

    pub fn bound(data: T, errors: FormErrors) -> Self {
        Self { data, errors, is_bound: true }
    }

    pub fn is_valid(&self) -> bool {
        self.is_bound && self.errors.is_empty()
    }
}

/// Runs the derive validators and wraps the outcome.
pub fn bind<T: Validate + Serialize>(data: T) -> BoundForm<T> {
    let errors = match data.validate() {
        Ok(()) => FormErrors::default(),
        Err(e) => e.into(),
    };
    BoundForm::bound(data, errors)
}
