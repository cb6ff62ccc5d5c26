pub mod user_document;

pub use user_document::UserDocumentRepository;
