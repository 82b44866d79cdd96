// Collaborators the migration engine talks to:
// - HTTP downloads of resource payloads
// - upload credentials and uploads on the platform's project storage
// - reading and writing local project files
//
// The engine only sees the traits; `CloudClient` and `LocalFileSystem` are
// the production implementations.

pub mod api;
pub mod cloud_client;
pub mod errors;
pub mod local_fs;
pub mod traits;
pub mod types;

pub use cloud_client::CloudClient;
pub use errors::{ClientError, ClientResult};
pub use local_fs::LocalFileSystem;
pub use traits::{
    CredentialService, FetchTransport, LocalFileReader, LocalFileWriter, UploadService,
};
pub use types::{AuthenticatedCaller, UploadCredentials, UploadFile, UploadResponseItem};
