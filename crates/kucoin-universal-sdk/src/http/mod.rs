/*
[INPUT]:  ClientOption and typed REST requests
[OUTPUT]: Signed HTTP calls, decoded RestResponse values, unified errors
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding transport features or changing response handling
*/

pub mod client;
pub mod error;
pub mod interceptor;
pub mod response;
pub mod signature;

pub use error::{KucoinError, Result};
pub use signature::KcSigner;

pub use client::{PreparedRequest, Transport, prepare_request, request_target, sign_payload};
pub use interceptor::{CallOutcome, Interceptor, LoggingInterceptor, RequestContext};
pub use response::{RestRateLimit, RestResponse};
