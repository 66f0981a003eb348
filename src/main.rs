use std::path::Path;
use std::time::Duration;

use gantry::dialogue::Session;
use gantry::fixtures;
use gantry::line_editor::{LineEditor, ReadResult};
use gantry::pipeline::{self, Outcome};
use gantry::ui;

const PAUSE: Duration = Duration::from_millis(300);

fn main() {
    let world = match load_world() {
        Ok(world) => world,
        Err(message) => {
            eprintln!("{}", ui::error_line(&message));
            std::process::exit(1);
        }
    };

    println!("{}", ui::bold("gantry — a blocks-world planning shell"));
    println!(
        "{}",
        ui::dim("Tell the arm what to do, e.g. \"put the white ball in a box\".")
    );
    println!("{}", ui::dim("Commands: :world  :reset  :help  :quit"));
    println!();

    let mut session = Session::new(world);
    let initial = session.world.clone();
    println!("{}", ui::render_world(&session.world));
    println!();

    let mut editor = LineEditor::new();
    loop {
        let line = match editor.read_line("> ") {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => continue,
            ReadResult::Eof => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        editor.add_history(input);

        match input {
            ":quit" | ":q" | "quit" | "exit" => break,
            ":world" => {
                println!("{}", ui::render_world(&session.world));
                continue;
            }
            ":reset" => {
                session = Session::new(initial.clone());
                println!("{}", ui::render_world(&session.world));
                continue;
            }
            ":help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        match pipeline::process_utterance(&mut session, input) {
            Outcome::Plan(plan) => {
                ui::animate(&mut session.world, &plan, PAUSE);
            }
            Outcome::Clarify(question) => {
                println!("{}", ui::question_line(&question));
            }
            Outcome::Failure(message) => {
                println!("{}", ui::error_line(&message));
            }
        }
        println!();
    }
}

/// Pick the starting world: a builtin name or a YAML path from argv, the
/// small world otherwise.
fn load_world() -> Result<gantry::world::WorldState, String> {
    match std::env::args().nth(1) {
        None => fixtures::load_str(fixtures::SMALL_WORLD).map_err(|e| e.to_string()),
        Some(arg) => {
            if let Some(yaml) = fixtures::builtin(&arg) {
                return fixtures::load_str(yaml).map_err(|e| e.to_string());
            }
            let path = Path::new(&arg);
            if path.exists() {
                return fixtures::load_file(path).map_err(|e| e.to_string());
            }
            Err(format!(
                "unknown world '{}' (builtins: {})",
                arg,
                fixtures::builtin_names().join(", ")
            ))
        }
    }
}

fn print_help() {
    println!("Verbs: take, put, move — e.g.");
    println!("  take the yellow box");
    println!("  put the white ball in a box on the floor");
    println!("  move all balls to the left of the table");
    println!("Quantifiers: the (unique), a/any (some), all/every (each).");
    println!("When I ask a question, answer it — or just give a new command.");
}
