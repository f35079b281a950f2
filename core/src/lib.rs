pub mod document;
pub mod error;
pub mod query;
pub mod store;

pub use document::{
    EducationEntry, ExperienceEntry, PersonalInfo, ProfileDocument, ProjectEntry, Skills,
};
pub use store::{DocumentStore, FileDocumentStore, StaticDocumentStore, StoreError};
