//! Pokedex TUI - endless catalog browser

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::{self, CatalogSource, FetchError, PokeApiClient};
use pokedex::config::CatalogArgs;
use pokedex::effect::Effect;
use pokedex::logging::{self, LogArgs};
use pokedex::reducer::reducer;
use pokedex::sprite;
use pokedex::state::AppState;
use pokedex::ui::{self, PokedexComponentId, PokedexContext, PokedexUi};

static SOURCE: OnceLock<Arc<dyn CatalogSource>> = OnceLock::new();

/// Endless Pokedex with search and renaming
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse the PokeAPI catalog with search, renaming and type colors")]
struct Args {
    #[command(flatten)]
    catalog: CatalogArgs,

    #[command(flatten)]
    log: LogArgs,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init_logging(&args.log)?;

    let client = PokeApiClient::new(Duration::from_secs(args.catalog.timeout_secs))
        .map_err(io::Error::other)?;
    let _ = SOURCE.set(Arc::new(client));
    tracing::info!(start = %args.catalog.start_url(), "starting pokedex");

    let debug = DebugSession::new(args.debug);
    debug
        .save_state_schema::<AppState>()
        .map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let catalog_args = args.catalog.clone();
    let state = debug
        .load_state_or_else_async(|| async move {
            Ok::<AppState, io::Error>(AppState::new(&catalog_args))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("pokedex exited");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> =
        EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_search = Rc::clone(&ui);
    bus.register(PokedexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_list = Rc::clone(&ui);
    bus.register(PokedexComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_profile = Rc::clone(&ui);
    bus.register(PokedexComponentId::Profile, move |event, state| {
        ui_profile
            .borrow_mut()
            .handle_profile_event(&event.kind, state)
    });

    bus.register_global(|event, state| ui::handle_global_event(&event.kind, state));

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(90), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn source() -> Result<Arc<dyn CatalogSource>, FetchError> {
    SOURCE
        .get()
        .cloned()
        .ok_or_else(|| FetchError::Upstream("catalog source not configured".to_string()))
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchPage { url } => {
            ctx.tasks().spawn(TaskKey::new("catalog_page"), async move {
                let page = match source() {
                    Ok(source) => api::load_page(source, &url).await,
                    Err(error) => Err(error),
                };
                match page {
                    Ok(page) => Action::PageDidLoad(page),
                    Err(error) => Action::PageDidError {
                        url,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::DebounceQuery { query, delay_ms } => {
            ctx.tasks().debounce(
                "catalog_query",
                Duration::from_millis(delay_ms),
                async move { Action::SearchApply(query) },
            );
        }
        Effect::CancelPendingQuery => {
            ctx.tasks().cancel(&TaskKey::new("catalog_query"));
        }
        Effect::LoadSprite { name, url } => {
            let key = format!("sprite_{name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let bytes = match source() {
                    Ok(source) => source.fetch_bytes(&url).await,
                    Err(error) => Err(error),
                };
                match bytes {
                    Ok(bytes) => match sprite::decode_sprite(&bytes) {
                        Ok(sprite) => Action::SpriteDidLoad { name, sprite },
                        Err(error) => Action::SpriteDidError { name, error },
                    },
                    Err(error) => Action::SpriteDidError {
                        name,
                        error: error.to_string(),
                    },
                }
            });
        }
    }
}
