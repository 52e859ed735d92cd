pub mod constraints;
pub mod credential;
pub mod definition;
pub mod descriptor;
pub mod field;
pub mod filter;
pub mod format;
pub mod requirement;

pub use constraints::{Constraints, HolderSubject};
pub use credential::{append_tmp_suffix, strip_tmp_suffix, Credential, Disclosure, HashAlg, ProofBlock, SdJwtMeta, TMP_MARKER};
pub use definition::PresentationDefinition;
pub use descriptor::{InputDescriptor, Rule, SchemaEntry, SubmissionRequirement};
pub use field::Field;
pub use filter::{Directive, Filter};
pub use format::{ClaimFormatDesignation, ClaimFormatProperty, Format};
pub use requirement::Requirement;
