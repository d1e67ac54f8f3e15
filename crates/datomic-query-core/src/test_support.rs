use crate::{
    document::QueryDocument,
    submit::{SubmitError, Submitter, check_response},
};
use async_trait::async_trait;
use std::sync::Mutex;

///
/// RecordingSubmitter
///
/// Captures every submitted document and answers with a fixed body.
///

pub(crate) struct RecordingSubmitter {
    response: serde_json::Value,
    submitted: Mutex<Vec<QueryDocument>>,
}

impl RecordingSubmitter {
    pub(crate) const fn new(response: serde_json::Value) -> Self {
        Self {
            response,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn submitted(&self) -> Vec<QueryDocument> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(&self, document: &QueryDocument) -> Result<serde_json::Value, SubmitError> {
        self.submitted.lock().unwrap().push(document.clone());

        check_response(self.response.clone())
    }
}
