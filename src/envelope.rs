use serde::{Deserialize, Serialize};

/// Wraps every successful payload as `{"data": ...}`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Envelope<T> {
        Envelope { data }
    }
}
