//! Move ordering tests for [`BoardStore`] and [`DragInterpreter`].

use std::io;
use std::sync::Arc;

use crate::board::helpers::{
    Gateway, Store, gateway, runtime, seed_column, seed_task, server_board,
};
use rstest::rstest;
use tokio::runtime::Runtime;
use trellis::board::{
    adapters::memory::{FailureMode, GatewayOperation},
    domain::{ColumnId, DragGesture, DropTarget, Position, TaskId},
    services::{BoardStore, BoardStoreError, DragInterpreter, DragOutcome, MoveOutcome},
};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// "To Do" holding `[first, second]` next to an empty "Done".
struct TwoColumns {
    store: Store,
    todo: ColumnId,
    done: ColumnId,
    first: TaskId,
    second: TaskId,
}

fn two_columns(rt: &Runtime, gateway: &Arc<Gateway>) -> Result<TwoColumns, BoardStoreError> {
    rt.block_on(async {
        let todo = seed_column(gateway, "To Do").await?;
        let done = seed_column(gateway, "Done").await?;
        let first = seed_task(gateway, todo, "First").await?;
        let second = seed_task(gateway, todo, "Second").await?;
        let store = BoardStore::new(Arc::clone(gateway));
        store.load_all().await?;
        Ok::<_, BoardStoreError>(TwoColumns {
            store,
            todo,
            done,
            first,
            second,
        })
    })
}

/// Moving the first task to position two swaps the pair.
#[rstest]
fn reorder_within_column(runtime: io::Result<Runtime>, gateway: Arc<Gateway>) -> TestResult {
    let rt = runtime?;
    let board = two_columns(&rt, &gateway)?;

    let target = Position::new(2)?;
    let outcome = rt.block_on(board.store.move_task(board.first, board.todo, target))?;

    assert!(matches!(outcome, MoveOutcome::Moved(_)));
    assert_eq!(
        board.store.snapshot().task_ids_in(board.todo),
        Some(vec![board.second, board.first])
    );
    assert_eq!(board.store.snapshot(), rt.block_on(server_board(&gateway))?);
    Ok(())
}

/// Moving into an empty column leaves the remainder behind.
#[rstest]
fn move_into_empty_column(runtime: io::Result<Runtime>, gateway: Arc<Gateway>) -> TestResult {
    let rt = runtime?;
    let board = two_columns(&rt, &gateway)?;

    rt.block_on(board.store.move_task(board.first, board.done, Position::FIRST))?;

    let snapshot = board.store.snapshot();
    assert_eq!(snapshot.task_ids_in(board.todo), Some(vec![board.second]));
    assert_eq!(snapshot.task_ids_in(board.done), Some(vec![board.first]));
    Ok(())
}

/// A failed move leaves exactly what a fresh load would produce.
#[rstest]
#[case(FailureMode::BeforeCommit)]
#[case(FailureMode::AfterCommit)]
fn failed_move_matches_fresh_load(
    runtime: io::Result<Runtime>,
    gateway: Arc<Gateway>,
    #[case] mode: FailureMode,
) -> TestResult {
    let rt = runtime?;
    let board = two_columns(&rt, &gateway)?;
    gateway.fail_next(GatewayOperation::MoveTask, mode);

    let result = rt.block_on(board.store.move_task(board.first, board.done, Position::FIRST));

    assert!(matches!(result, Err(BoardStoreError::Gateway(_))));
    let fresh = BoardStore::new(Arc::clone(&gateway));
    rt.block_on(fresh.load_all())?;
    assert_eq!(board.store.snapshot(), fresh.snapshot());
    assert_eq!(board.store.snapshot().task_count(), 2);
    assert!(board.store.current_error().is_some());
    Ok(())
}

/// Gestures drive the same protocol through the interpreter.
#[rstest]
fn gestures_move_tasks_between_columns(
    runtime: io::Result<Runtime>,
    gateway: Arc<Gateway>,
) -> TestResult {
    let rt = runtime?;
    let TwoColumns {
        store,
        todo,
        done,
        first,
        second,
    } = two_columns(&rt, &gateway)?;
    let shared = Arc::new(store);
    let interpreter = DragInterpreter::new(Arc::clone(&shared));

    let ignored = rt.block_on(interpreter.handle(DragGesture::dropped_outside(first)))?;
    let moved = rt.block_on(interpreter.handle(DragGesture::dropped_on(
        second,
        DropTarget::Column(done),
    )))?;
    let inserted = rt.block_on(interpreter.handle(DragGesture::dropped_on(
        first,
        DropTarget::Task(second),
    )))?;

    assert_eq!(ignored, DragOutcome::Ignored);
    assert!(matches!(moved, DragOutcome::Moved(_)));
    assert!(matches!(inserted, DragOutcome::Moved(_)));
    let snapshot = shared.snapshot();
    assert_eq!(snapshot.task_ids_in(todo), Some(Vec::new()));
    assert_eq!(snapshot.task_ids_in(done), Some(vec![first, second]));
    assert_eq!(snapshot, rt.block_on(server_board(&gateway))?);
    Ok(())
}
