//! Optional `If-Match` precondition carrying the room version a client
//! expects to act on.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::IF_MATCH;
use actix_web::{FromRequest, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::http::etag::parse_room_version_from_etag;

/// `None` when the header is absent or `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfMatch(pub Option<u64>);

impl IfMatch {
    pub fn expected_version(&self) -> Option<u64> {
        self.0
    }
}

fn parse(req: &HttpRequest) -> Result<IfMatch, AppError> {
    let Some(value) = req.headers().get(IF_MATCH) else {
        return Ok(IfMatch(None));
    };
    let raw = value.to_str().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidHeader, "If-Match must be visible ASCII")
    })?;
    if raw.trim() == "*" {
        return Ok(IfMatch(None));
    }
    parse_room_version_from_etag(raw).map(|version| IfMatch(Some(version)))
}

impl FromRequest for IfMatch {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse(req))
    }
}
