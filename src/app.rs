use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use crate::config::GameConfig;
#[cfg(feature = "hydrate")]
use crate::controller::RoundId;
use crate::controller::GameController;
use crate::grid::{body_rows, cell_dom_id, header_cells};
use crate::model::CellPos;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();
    provide_context(GameConfig::default());

    view! {
        <Stylesheet id="leptos" href="/pkg/trivia-board.css" />

        <Title text="Jeopardy!" />

        <Router>
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("/") view=TriviaGame />
                </Routes>
            </main>
        </Router>
    }
}

/// The game page. Owns the controller; everything below it only borrows the signal.
#[component]
fn TriviaGame() -> impl IntoView {
    let config = use_context::<GameConfig>().unwrap_or_default();
    let game = RwSignal::new(GameController::new(config));

    let loading = Signal::derive(move || game.with(|g| g.loading_visible()));
    let label = Signal::derive(move || game.with(|g| g.control_label()));
    let on_start = Callback::new(move |_: ()| start_round(game));

    view! {
        <div class="trivia">
            <h1>"Jeopardy!"</h1>
            <BoardTable game=game />
            <div id="center">
                <LoadingIndicator visible=loading />
            </div>
            {move || {
                game.with(|g| {
                    g.failure_message()
                        .map(|message| {
                            let message = format!("Could not load a board: {}", message);
                            view! { <p class="error">{message}</p> }
                        })
                })
            }}
            <GameControl label=label on_activate=on_start />
        </div>
    }
}

/// Header row plus `rows_shown` rows of clue cells. Mounted fresh each time a round is ready.
#[component]
fn BoardTable(game: RwSignal<GameController>) -> impl IntoView {
    let (rows, cols) = game.with_untracked(|g| (g.config().rows_shown, g.config().num_categories));

    let header = move || {
        game.with_untracked(|g| header_cells(g.board()))
            .into_iter()
            .map(|cell| view! { <th id=cell.dom_id>{cell.title}</th> })
            .collect_view()
    };
    let body = move || {
        body_rows(rows, cols)
            .into_iter()
            .map(|row| {
                view! {
                    <tr>
                        {row
                            .into_iter()
                            .map(|pos| view! { <ClueCell game=game pos=pos /> })
                            .collect_view()}
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <Show when=move || game.with(|g| g.board_visible())>
            <table id="jeopardy">
                <thead>
                    <tr id="categories">{header}</tr>
                </thead>
                <tbody id="tablebody">{body}</tbody>
            </table>
        </Show>
    }
}

#[component]
fn ClueCell(game: RwSignal<GameController>, pos: CellPos) -> impl IntoView {
    let text = move || game.with(|g| g.cell_text(pos));
    let class = move || game.with(|g| g.board().cell_state(pos).css_class());

    view! {
        <td id=cell_dom_id(pos) class=class on:click=move |_| handle_cell_click(game, pos)>
            {text}
        </td>
    }
}

#[component]
fn LoadingIndicator(visible: Signal<bool>) -> impl IntoView {
    view! {
        <Show when=move || visible.get()>
            <div id="load" class="spinner" />
        </Show>
    }
}

/// The start/reset/retry button. Hidden while a round is loading.
#[component]
fn GameControl(label: Signal<Option<&'static str>>, on_activate: Callback<()>) -> impl IntoView {
    move || {
        label.get().map(|text| {
            view! {
                <button class="control" on:click=move |_| on_activate.run(())>
                    {text}
                </button>
            }
        })
    }
}

fn handle_cell_click(game: RwSignal<GameController>, pos: CellPos) {
    game.maybe_update(|g| g.click(pos).is_some());
}

fn start_round(game: RwSignal<GameController>) {
    let mut started = None;
    game.update(|g| started = g.begin_round().map(|round| (round, g.config().clone())));
    let Some((round, config)) = started else {
        warn!("Ignoring start: a round is already loading");
        return;
    };
    log!("Starting round {:?}", round);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(play_round(game, round, config));
    #[cfg(not(feature = "hydrate"))]
    let _ = config;
}

/// Fetches the board, then runs the loading indicator and reveal on their timers.
#[cfg(feature = "hydrate")]
async fn play_round(game: RwSignal<GameController>, round: RoundId, config: GameConfig) {
    use crate::controller::{pacing_schedule, PacingStep};
    use crate::provider::{load_board, HttpProvider};
    use gloo_timers::future::TimeoutFuture;
    use leptos::logging::error;

    let provider = HttpProvider::new(config.clone());
    let mut rng = rand::rng();
    match load_board(&provider, &config, &mut rng).await {
        Ok(categories) => {
            let mut committed = false;
            game.update(|g| committed = g.commit(round, categories));
            if !committed {
                warn!("Board for round {:?} was not installed", round);
                return;
            }
        }
        Err(err) => {
            let source = if err.is_network() { "provider" } else { "board setup" };
            error!("Round {:?} failed in {}: {}", round, source, err);
            game.update(|g| {
                g.fail(round, &err);
            });
            return;
        }
    }

    for (wait, step) in pacing_schedule(&config) {
        TimeoutFuture::new(wait).await;
        match step {
            PacingStep::HideLoading => game.update(|g| {
                g.hide_loading(round);
            }),
            PacingStep::RevealBoard => game.update(|g| {
                g.reveal_board(round);
            }),
        }
    }
    log!("Round {:?} ready", round);
}
