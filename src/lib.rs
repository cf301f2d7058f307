//! Smart Phishing Guard - Classification Core
//!
//! Feature-driven phishing risk estimation for one page load at a time:
//! lexical features from the URL, structural features from a document
//! snapshot, fusion into one record, and evaluation against a pre-trained
//! linear or decision-forest model, with human-readable reasons for an
//! unsafe verdict.
//!
//! The host (extension process, test harness) drives the
//! [`VerdictDispatcher`] with navigation events and receives verdicts
//! through the [`VerdictSink`] seam. Everything fails open: a missing or
//! malformed model, an unparsable URL, or an unresolvable element degrade
//! toward `safe`, never toward a crash.

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{ConfigError, ConfigResult};
pub use logic::dispatcher::{Generation, PageId, VerdictDispatcher, VerdictSink};
pub use logic::features::{
    extract_dom_features, extract_url_features, DomElement, DomSnapshot, FeatureRecord,
    UrlFeatureSet,
};
pub use logic::model::{ModelDescriptor, ModelStatus};
pub use logic::trust::{root_domain, AllowList};
pub use logic::verdict::{Verdict, VerdictLabel};
