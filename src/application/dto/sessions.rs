/// Subject of an active session held by the external session provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSubject {
    pub subject_id: String,
}

impl SessionSubject {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
        }
    }
}
