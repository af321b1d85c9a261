use dioxus::prelude::*;

use crate::vm::ScoreRow;

#[component]
pub fn ScoreView(
    score: usize,
    total: usize,
    rows: Vec<ScoreRow>,
    on_restart: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "page score-page",
            header { class: "view-header",
                h2 { class: "view-title", "Quiz complete" }
                p { class: "view-subtitle", "You scored {score} out of {total}." }
            }

            // Definition list reads well for prompt/result pairs.
            dl { class: "breakdown",
                for row in rows {
                    dt { key: "{row.number}",
                        span {
                            class: if row.correct { "mark mark-correct" } else { "mark mark-wrong" },
                            if row.correct { "Correct" } else { "Incorrect" }
                        }
                        " Q{row.number}. {row.prompt}"
                    }
                    dd {
                        {format!(
                            "Your answer: {}",
                            row.chosen.clone().unwrap_or_else(|| "(none)".into())
                        )}
                        br {}
                        {format!("Correct answer: {}", row.expected)}
                    }
                }
            }

            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_restart.call(()),
                "Restart"
            }
        }
    }
}
