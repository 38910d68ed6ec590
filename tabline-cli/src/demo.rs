//! Demo command set wired into the console at startup.
//!
//! Commands close over a shared [`Session`] so generators can offer live
//! candidates (for example, `item remove` completes only existing items).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tabline_core::{
    AliasGroup, ArgumentError, CommandContext, Console, TextSink, generator, literal,
};

/// Highest value accepted by `set volume`.
const MAX_VOLUME: u32 = 100;

const HELP_TEXT: &str = "commands: echo <text>, set volume <0-100>, item add|remove|show, \
                         list, quit. Tab completes, Up/Down browse history.";

/// State shared between the demo commands and the host loop.
#[derive(Debug, Clone, Default)]
pub struct Session {
    quit: Arc<AtomicBool>,
    volume: Arc<Mutex<u32>>,
    items: Arc<Mutex<Vec<String>>>,
}

impl Session {
    /// Whether `quit` has been submitted.
    pub fn should_quit(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn volume(&self) -> u32 {
        *locked(&self.volume)
    }

    fn items(&self) -> Vec<String> {
        locked(&self.items).clone()
    }
}

/// Lock shared state, recovering the data if a previous holder panicked.
fn locked<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register the demo commands on `console` and return their shared state.
pub fn register_demo_commands<S: TextSink>(console: &mut Console<S>) -> Session {
    let session = Session::default();

    console.register(
        vec![literal(&["echo", "say"])],
        1,
        Arc::new(|ctx: &CommandContext<'_>| {
            ctx.arg(1)?;
            Ok(ctx.tokens()[1..].join(" "))
        }),
    );

    let volume = Arc::clone(&session.volume);
    console.register(
        vec![literal(&["set", "s"]), literal(&["volume", "vol"])],
        2,
        Arc::new(move |ctx: &CommandContext<'_>| {
            let level: u32 = ctx.parse_arg(2)?;
            if level > MAX_VOLUME {
                return Err(ArgumentError::OutOfRange);
            }
            *locked(&volume) = level;
            Ok(format!("volume set to {level}"))
        }),
    );

    let items = Arc::clone(&session.items);
    console.register(
        vec![literal(&["item", "it"]), literal(&["add"])],
        2,
        Arc::new(move |ctx: &CommandContext<'_>| {
            let name = ctx.arg(2)?.to_string();
            let mut items = locked(&items);
            if items.contains(&name) {
                return Ok(format!("{name} already present"));
            }
            items.push(name.clone());
            tracing::debug!(item = %name, count = items.len(), "Item added");
            Ok(format!("added {name}"))
        }),
    );

    let listed = session.clone();
    let items = Arc::clone(&session.items);
    console.register(
        vec![
            literal(&["item", "it"]),
            literal(&["remove", "rm"]),
            generator(move || {
                listed
                    .items()
                    .iter()
                    .map(|name| AliasGroup::from([name.as_str()]))
                    .collect()
            }),
        ],
        2,
        Arc::new(move |ctx: &CommandContext<'_>| {
            let name = ctx.arg(2)?;
            let mut items = locked(&items);
            let Some(index) = items.iter().position(|item| item == name) else {
                return Err(ArgumentError::Invalid);
            };
            items.remove(index);
            Ok(format!("removed {name}"))
        }),
    );

    let shown = session.clone();
    console.register(
        vec![literal(&["item", "it"]), literal(&["show", "ls"])],
        2,
        Arc::new(move |_ctx: &CommandContext<'_>| {
            let items = shown.items();
            if items.is_empty() {
                Ok("no items".to_string())
            } else {
                Ok(items.join(", "))
            }
        }),
    );

    let quitting = session.clone();
    console.register(
        vec![literal(&["quit", "exit"])],
        1,
        Arc::new(move |_ctx: &CommandContext<'_>| {
            quitting.request_quit();
            Ok("bye".to_string())
        }),
    );

    console.register_legacy(
        "help",
        Arc::new(|_ctx: &CommandContext<'_>| Ok(HELP_TEXT.to_string())),
    );

    session
}
