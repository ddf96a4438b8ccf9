// Unit tests for DomainError -> AppError mapping, no HTTP server involved.
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::AppError;

#[test]
fn malformed_input_maps_to_400() {
    let app: AppError = DomainError::validation(ValidationKind::InvalidRoomCode, "bad code").into();
    assert_eq!(app.code(), ErrorCode::InvalidRoomCode);
    assert_eq!(app.status().as_u16(), 400);

    let app: AppError = DomainError::validation(ValidationKind::MissingField, "no name").into();
    assert_eq!(app.code(), ErrorCode::MissingField);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn rule_violations_map_to_422() {
    let cases = [
        (ValidationKind::CardNotInHand, ErrorCode::CardNotInHand),
        (ValidationKind::IllegalMove, ErrorCode::IllegalMove),
        (ValidationKind::WildColorRequired, ErrorCode::WildColorRequired),
        (ValidationKind::UnoAlreadyCalled, ErrorCode::UnoAlreadyCalled),
        (ValidationKind::PhaseMismatch, ErrorCode::PhaseMismatch),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::validation(kind, "nope").into();
        assert_eq!(app.code(), code);
        assert_eq!(app.status().as_u16(), 422);
    }
}

#[test]
fn forbidden_kinds_map_to_403() {
    let app: AppError = DomainError::forbidden(ForbiddenKind::OutOfTurn, "wait").into();
    assert_eq!(app.code(), ErrorCode::OutOfTurn);
    assert_eq!(app.status().as_u16(), 403);

    let app: AppError = DomainError::forbidden(ForbiddenKind::NotHost, "host only").into();
    assert_eq!(app.code(), ErrorCode::NotHost);
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::optimistic_lock(3, 4).into();
    assert_eq!(app.code().as_str(), "OPTIMISTIC_LOCK");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::conflict(ConflictKind::RoomCodeTaken, "taken").into();
    assert_eq!(app.code().as_str(), "ROOM_CODE_TAKEN");

    let app: AppError =
        DomainError::conflict(ConflictKind::Other("x".into()), "generic conflict").into();
    assert_eq!(app.code().as_str(), "CONFLICT");
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::room_not_found("ABCD").into();
    assert_eq!(app.code(), ErrorCode::RoomNotFound);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::not_found(NotFoundKind::Player, "gone").into();
    assert_eq!(app.code(), ErrorCode::PlayerNotFound);
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "slow").into();
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let app: AppError = DomainError::infra(InfraErrorKind::StoreUnavailable, "down").into();
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::infra(InfraErrorKind::DataCorruption, "bad").into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn optimistic_lock_detail_names_both_versions() {
    let err = DomainError::optimistic_lock(7, 9);
    assert!(err.is_optimistic_lock());
    assert!(err.to_string().contains("expected version 7, actual version 9"));
}
