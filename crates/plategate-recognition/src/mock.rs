//! Scripted mock recognizer for testing and development.
//!
//! The mock serves recognition outcomes from a queue loaded through its
//! handle, in the same style as the mock hardware devices.

use crate::client::PlateRecognizer;
use crate::error::{RecognitionError, Result};
use crate::types::PlateGuess;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type OutcomeQueue = Arc<Mutex<VecDeque<Result<Vec<PlateGuess>>>>>;

/// Mock plate recognizer.
///
/// Each call to [`PlateRecognizer::recognize`] pops the next scripted
/// outcome; an empty queue yields a transport error so an unexpected
/// extra cycle fails loudly instead of silently matching nothing.
///
/// # Examples
///
/// ```
/// use plategate_recognition::PlateGuess;
/// use plategate_recognition::client::PlateRecognizer;
/// use plategate_recognition::mock::MockRecognizer;
///
/// #[tokio::main]
/// async fn main() {
///     let (recognizer, handle) = MockRecognizer::new();
///
///     handle.push_guesses(vec![PlateGuess::new("ABC123", 92.0).unwrap()]);
///     let guesses = recognizer.recognize(b"jpeg").await.unwrap();
///     assert_eq!(guesses[0].plate.as_str(), "ABC123");
/// }
/// ```
#[derive(Debug)]
pub struct MockRecognizer {
    outcomes: OutcomeQueue,
}

impl MockRecognizer {
    /// Create a new mock recognizer and its control handle.
    pub fn new() -> (Self, MockRecognizerHandle) {
        let outcomes: OutcomeQueue = Arc::new(Mutex::new(VecDeque::new()));
        let recognizer = Self {
            outcomes: Arc::clone(&outcomes),
        };
        (recognizer, MockRecognizerHandle { outcomes })
    }
}

impl PlateRecognizer for MockRecognizer {
    async fn recognize(&self, _image: &[u8]) -> Result<Vec<PlateGuess>> {
        self.outcomes
            .lock()
            .expect("recognizer outcome lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(RecognitionError::transport("no outcome queued")))
    }
}

/// Handle for scripting a [`MockRecognizer`]'s outcomes.
#[derive(Debug, Clone)]
pub struct MockRecognizerHandle {
    outcomes: OutcomeQueue,
}

impl MockRecognizerHandle {
    /// Queue a successful recognition returning the given guesses.
    ///
    /// An empty list simulates "no plate readable in this image".
    pub fn push_guesses(&self, guesses: Vec<PlateGuess>) {
        self.outcomes
            .lock()
            .expect("recognizer outcome lock poisoned")
            .push_back(Ok(guesses));
    }

    /// Queue a recognition failure.
    pub fn push_error(&self, error: RecognitionError) {
        self.outcomes
            .lock()
            .expect("recognizer outcome lock poisoned")
            .push_back(Err(error));
    }

    /// Number of scripted outcomes not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.outcomes
            .lock()
            .expect("recognizer outcome lock poisoned")
            .len()
    }
}
