//! A two-section to-do list driven through a recording table.
//!
//! Run with `RUST_LOG=braid=debug cargo run --example todo_list` to see the
//! diff and reconcile logs.

use braid::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sections)]
enum List {
    Open,
    Done,
}

#[derive(Debug, Clone, PartialEq, Identifiable)]
struct Task {
    #[identity]
    id: u32,
    title: &'static str,
}

#[derive(Default)]
struct TaskCell {
    label: String,
}

impl TableCell for TaskCell {
    fn prepare_for_reuse(&mut self) {
        self.label.clear();
    }
}

fn task(id: u32, title: &'static str) -> Task {
    Task { id, title }
}

fn print_ops(step: &str, table: &mut RecordingTable) {
    println!("{step}:");
    for op in table.take_ops() {
        println!("  {op:?}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut setup = BinderSetup::<List>::declared().with_config(
        BinderConfig::new()
            .with_section_display_behavior(SectionDisplayBehavior::HidesSectionsWithNoCellData)
            .with_row_animation(RowAnimation::Fade),
    );
    setup
        .on_sections([List::Open, List::Done])
        .bind_cell::<TaskCell>()
        .models::<Task>(ContentSource::External)
        .on_dequeue(|section, _, cell, task| {
            cell.label = format!("[{}] {}", if *section == List::Done { "x" } else { " " }, task.title);
        })
        .cell_height(|_, _, _| 44.0)
        .allow_editing(EditingStyle::Delete)
        .on_delete(|section, row, task, reason| {
            println!("  deleted {:?} from {section:?} row {row} ({reason:?})", task.title);
        });
    setup.on_section(List::Done).header_title("Done");

    let mut binder = setup.finish(RecordingTable::new());
    print_ops("finish", binder.host_mut());

    binder.update_cell_models(
        List::Open,
        vec![task(1, "Write docs"), task(2, "Fix build"), task(3, "Ship")],
    );
    print_ops("three open tasks", binder.host_mut());

    binder.batch(|binder| {
        binder.update_cell_models(List::Open, vec![task(1, "Write docs"), task(3, "Ship")]);
        binder.update_cell_models(List::Done, vec![task(2, "Fix build")]);
    });
    print_ops("task 2 done", binder.host_mut());

    binder.render_all();
    for section in 0..binder.number_of_sections() {
        for row in 0..binder.number_of_rows(section) {
            let index_path = IndexPath::new(section, row);
            if let Some(cell) = binder.host().visible_cell::<TaskCell>(index_path) {
                println!("  {index_path}: {}", cell.label);
            }
        }
    }

    binder.commit_editing(EditingStyle::Delete, IndexPath::new(0, 0));
    print_ops("user deleted the first open task", binder.host_mut());
}
