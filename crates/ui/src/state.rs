#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    InvalidInput,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::NotFound => "That experiment is not available.",
            ViewError::InvalidInput => "Please check the values you entered.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}
