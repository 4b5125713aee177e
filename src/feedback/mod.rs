// Feedback log — user-reported false positives / false negatives.
//
// Independent of the detection store. The FeedbackLog trait keeps the backend
// swappable; JsonFileFeedbackLog keeps the on-disk format the dashboard
// tooling already reads (a single JSON array).

pub mod json_file;
pub mod traits;

pub use json_file::JsonFileFeedbackLog;
pub use traits::{FeedbackEntry, FeedbackLog};
