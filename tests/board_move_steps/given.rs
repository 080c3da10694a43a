//! Given steps for board move BDD scenarios.

use super::world::{BoardMoveWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use trellis::board::{
    adapters::memory::{FailureMode, GatewayOperation},
    ports::{BoardGateway, NewColumn, NewTask},
};

#[given(r#"a board with column "{column}" holding "{first}" and "{second}""#)]
fn board_with_column(
    world: &mut BoardMoveWorld,
    column: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let created = run_async(world.gateway.create_column(&NewColumn {
        title: column.clone(),
    }))
    .wrap_err("seed column")?;
    world.columns.insert(column, created.id());

    for title in [first, second] {
        let task = run_async(world.gateway.create_task(&NewTask {
            title: title.clone(),
            description: None,
            column_id: created.id(),
        }))
        .wrap_err("seed task")?;
        world.tasks.insert(title, task.id());
    }

    run_async(world.store.load_all()).wrap_err("load seeded board")?;
    Ok(())
}

#[given(r#"an empty column "{title}""#)]
fn empty_column(world: &mut BoardMoveWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(world.store.create_column(&title)).wrap_err("create empty column")?;
    world.columns.insert(title, created.id());
    Ok(())
}

#[given("the next move fails")]
fn next_move_fails(world: &mut BoardMoveWorld) {
    world
        .gateway
        .fail_next(GatewayOperation::MoveTask, FailureMode::BeforeCommit);
}
