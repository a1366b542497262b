//! Operation adapter: manager error codes become `(Some(code), default)`.

use std::time::Duration;

use pltfm_mgr_client::client::retry::RetryPolicy;
use pltfm_mgr_client::client::{PlatformClient, pltfm_mgr_try};
use pltfm_mgr_client::error::{Error, ManagerError};

use crate::scripted::{RecordingSleeper, ScriptedConnector, attempt_error};

fn policy() -> RetryPolicy {
    RetryPolicy::new(35, Duration::from_secs(1))
}

#[test]
fn success_maps_to_none_and_value() {
    let connector = ScriptedConnector::new();
    let mut sleeper = RecordingSleeper::new();

    let r = pltfm_mgr_try(&connector, &policy(), &mut sleeper, |_| Ok(true), false).unwrap();

    assert_eq!(r, (None, true));
}

#[test]
fn manager_error_maps_to_code_and_default() {
    let connector = ScriptedConnector::new();
    let mut sleeper = RecordingSleeper::new();

    let r = pltfm_mgr_try(
        &connector,
        &policy(),
        &mut sleeper,
        |_| -> pltfm_mgr_client::Result<i32> { Err(ManagerError::new(7).into()) },
        -1,
    )
    .unwrap();

    assert_eq!(r, (Some(7), -1));
    assert_eq!(sleeper.count(), 0);
}

#[test]
fn default_is_returned_unchanged() {
    let connector = ScriptedConnector::new();
    let mut sleeper = RecordingSleeper::new();
    let default = vec![String::from("fan1"), String::from("fan2")];

    let (code, v) = pltfm_mgr_try(
        &connector,
        &policy(),
        &mut sleeper,
        |_| -> pltfm_mgr_client::Result<Vec<String>> { Err(ManagerError::new(-2).into()) },
        default.clone(),
    )
    .unwrap();

    assert_eq!(code, Some(-2));
    assert_eq!(v, default);
}

#[test]
fn transport_failure_retried_before_code_is_reported() {
    let connector = ScriptedConnector::new();
    let mut sleeper = RecordingSleeper::new();
    let mut calls = 0;

    let r = pltfm_mgr_try(
        &connector,
        &policy(),
        &mut sleeper,
        |_| -> pltfm_mgr_client::Result<u8> {
            calls += 1;
            if calls == 1 {
                Err(attempt_error(1))
            } else {
                Err(ManagerError::new(11).into())
            }
        },
        0,
    )
    .unwrap();

    assert_eq!(r, (Some(11), 0));
    assert_eq!(calls, 2);
    assert_eq!(sleeper.count(), 1);
}

#[test]
fn exhausted_transport_error_propagates() {
    let connector = ScriptedConnector::refusing(u32::MAX);
    let mut sleeper = RecordingSleeper::new();

    let err = pltfm_mgr_try(
        &connector,
        &RetryPolicy::new(2, Duration::ZERO),
        &mut sleeper,
        |_| Ok(1u8),
        0,
    )
    .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(connector.opens(), 2);
}

#[test]
fn fatal_error_propagates_without_code() {
    let connector = ScriptedConnector::new();
    let mut sleeper = RecordingSleeper::new();

    let err = pltfm_mgr_try(
        &connector,
        &policy(),
        &mut sleeper,
        |_| -> pltfm_mgr_client::Result<u8> { Err(anyhow::anyhow!("bad stub").into()) },
        0,
    )
    .unwrap_err();

    assert!(matches!(err, Error::Fatal(_)));
}

#[test]
fn platform_client_wraps_adapter() {
    let mut client =
        PlatformClient::from_parts(ScriptedConnector::new(), policy(), RecordingSleeper::new());

    let r = client
        .pltfm_mgr_try(|c| Ok(c.connection_no), 0)
        .unwrap();

    assert_eq!(r, (None, 1));
    assert_eq!(client.connector().closes(), 1);
    assert_eq!(client.policy().attempts(), 35);
}
