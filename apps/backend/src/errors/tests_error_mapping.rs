#![cfg(test)]

use actix_web::http::StatusCode;

use crate::error::AppError;
use crate::errors::domain::DomainError;

#[test]
fn invalid_config_maps_to_bad_request() {
    let err = AppError::from(DomainError::InvalidConfig("field_width 9".to_string()));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn session_not_found_maps_to_not_found() {
    let err = AppError::from(DomainError::SessionNotFound("deadbeef".to_string()));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
fn move_rejections_are_not_client_facing() {
    for rejection in [
        DomainError::OutOfBounds { x: 9, y: 0 },
        DomainError::CellOccupied { x: 1, y: 1 },
        DomainError::NotYourTurn,
        DomainError::GameNotActive,
    ] {
        assert!(rejection.is_move_rejection());
        // If one ever leaks to HTTP it is a server bug, not a 4xx.
        let err = AppError::from(rejection);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[test]
fn creation_errors_are_not_move_rejections() {
    assert!(!DomainError::InvalidConfig("x".to_string()).is_move_rejection());
    assert!(!DomainError::SessionNotFound("x".to_string()).is_move_rejection());
}
