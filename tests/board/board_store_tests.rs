//! Column and task lifecycle tests for [`BoardStore`].
//!
//! Every test finishes by comparing the store's board with a fresh snapshot
//! read from the gateway.

use std::io;
use std::sync::Arc;

use crate::board::helpers::{Gateway, gateway, runtime, seed_column, server_board};
use rstest::rstest;
use tokio::runtime::Runtime;
use trellis::board::{
    adapters::memory::GatewayOperation,
    ports::TaskPatch,
    services::{BoardStore, BoardStoreConfig, BoardStoreError},
};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Builds a board through the store and checks it survives a reload.
#[rstest]
fn lifecycle_round_trips_through_reload(
    runtime: io::Result<Runtime>,
    gateway: Arc<Gateway>,
) -> TestResult {
    let rt = runtime?;
    let store = BoardStore::new(Arc::clone(&gateway));
    rt.block_on(store.load_all())?;

    let backlog = rt.block_on(store.create_column("Backlog"))?;
    let doing = rt.block_on(store.create_column("Doing"))?;
    let notes = rt.block_on(store.create_task(backlog.id(), "Write notes", Some("first draft")))?;
    let code = rt.block_on(store.create_task(backlog.id(), "Write code", None))?;
    rt.block_on(store.rename_column(doing.id(), "In progress"))?;
    rt.block_on(store.update_task(code.id(), TaskPatch::default().with_title("Write tests")))?;

    let local = store.snapshot();
    assert_eq!(local.task_ids_in(backlog.id()), Some(vec![notes.id(), code.id()]));
    assert_eq!(
        local.column(doing.id()).map(|column| column.title().to_owned()),
        Some("In progress".to_owned())
    );
    assert_eq!(local, rt.block_on(server_board(&gateway))?);

    rt.block_on(store.load_all())?;
    assert_eq!(store.snapshot(), local);
    Ok(())
}

/// Blank titles are rejected without contacting the gateway.
#[rstest]
#[case("")]
#[case("    ")]
fn blank_column_title_makes_no_call(
    runtime: io::Result<Runtime>,
    gateway: Arc<Gateway>,
    #[case] title: &str,
) -> TestResult {
    let rt = runtime?;
    let store = BoardStore::new(Arc::clone(&gateway));
    rt.block_on(store.load_all())?;
    let before = store.snapshot();

    let result = rt.block_on(store.create_column(title));

    assert!(result.is_err_and(|err| err.is_validation()));
    assert_eq!(gateway.calls(GatewayOperation::CreateColumn), 0);
    assert_eq!(store.snapshot(), before);
    assert!(store.current_error().is_none());
    Ok(())
}

/// Deleting a column removes its tasks locally and remotely.
#[rstest]
fn deleting_column_cascades(runtime: io::Result<Runtime>, gateway: Arc<Gateway>) -> TestResult {
    let rt = runtime?;
    let store = BoardStore::new(Arc::clone(&gateway));
    let column = rt.block_on(store.create_column("Doomed"))?;
    let task = rt.block_on(store.create_task(column.id(), "Casualty", None))?;

    rt.block_on(store.delete_column(column.id()))?;

    assert!(store.snapshot().is_empty());
    assert!(store.snapshot().task(task.id()).is_none());
    assert!(rt.block_on(server_board(&gateway))?.is_empty());
    Ok(())
}

/// Task title limits come from configuration.
#[rstest]
fn configured_task_title_limit_applies(
    runtime: io::Result<Runtime>,
    gateway: Arc<Gateway>,
) -> TestResult {
    let rt = runtime?;
    let config = BoardStoreConfig::from_json(r#"{ "max_task_title_chars": 4 }"#)?;
    let store = BoardStore::with_config(Arc::clone(&gateway), config);
    let column_id = rt.block_on(seed_column(&gateway, "Short"))?;
    rt.block_on(store.load_all())?;

    let accepted = rt.block_on(store.create_task(column_id, "Tidy", None));
    let rejected = rt.block_on(store.create_task(column_id, "Refactor", None));

    assert!(accepted.is_ok());
    assert!(matches!(rejected, Err(BoardStoreError::Domain(_))));
    assert_eq!(gateway.calls(GatewayOperation::CreateTask), 1);
    Ok(())
}

/// Gateway failures surface as the current error until dismissed.
#[rstest]
fn gateway_failure_is_reported_and_cleared(
    runtime: io::Result<Runtime>,
    gateway: Arc<Gateway>,
) -> TestResult {
    let rt = runtime?;
    let store = BoardStore::new(Arc::clone(&gateway));
    rt.block_on(store.load_all())?;
    gateway.fail_next(
        GatewayOperation::CreateColumn,
        trellis::board::adapters::memory::FailureMode::BeforeCommit,
    );

    let result = rt.block_on(store.create_column("Review"));

    assert!(matches!(result, Err(BoardStoreError::Gateway(_))));
    assert!(store.view().error.is_some());
    assert!(store.snapshot().is_empty());

    store.clear_error();
    assert!(store.view().error.is_none());
    Ok(())
}
