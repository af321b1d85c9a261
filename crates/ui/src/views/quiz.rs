use std::sync::Arc;

use dioxus::prelude::*;

use quiz_core::model::SelectionOutcome;

use crate::context::AppContext;
use crate::views::ScoreView;
use crate::vm::{QuizVm, option_letter};

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let controller = ctx.controller();
    let mut vm = use_signal({
        let controller = Arc::clone(&controller);
        move || QuizVm::read_from(&controller)
    });
    let mut advisory = use_signal(|| None::<String>);

    let view = vm();

    if view.completed {
        let restart_controller = Arc::clone(&controller);
        return rsx! {
            ScoreView {
                score: view.score,
                total: view.total,
                rows: view.score_rows.clone(),
                on_restart: move |()| {
                    let controller = Arc::clone(&restart_controller);
                    spawn(async move {
                        controller.restart().await;
                        advisory.set(None);
                        vm.set(QuizVm::read_from(&controller));
                    });
                },
            }
        };
    }

    rsx! {
        div { class: "page quiz-page",
            header { class: "view-header",
                h2 { class: "view-title", "Question {view.position} of {view.total}" }
                p { class: "quiz-prompt", "{view.prompt}" }
            }

            if let Some(message) = advisory() {
                div { class: "advisory",
                    span { "{message}" }
                    button {
                        class: "btn btn-link",
                        r#type: "button",
                        onclick: move |_| advisory.set(None),
                        "Dismiss"
                    }
                }
            }

            ul { class: "options",
                for row in view.options.clone() {
                    li { key: "{row.index}",
                        button {
                            class: if row.selected { "option option-selected" } else { "option" },
                            r#type: "button",
                            onclick: {
                                let controller = Arc::clone(&controller);
                                let option = row.index;
                                move |_| {
                                    let controller = Arc::clone(&controller);
                                    spawn(async move {
                                        let outcome = controller.select_answer(option).await;
                                        if let SelectionOutcome::Replaced { previous } = outcome {
                                            advisory.set(Some(format!(
                                                "Only one answer is permitted; option {} was replaced.",
                                                option_letter(previous)
                                            )));
                                        }
                                        vm.set(QuizVm::read_from(&controller));
                                    });
                                }
                            },
                            span { class: "option-letter", "{row.letter})" }
                            span { class: "option-text", "{row.text}" }
                        }
                    }
                }
            }

            div { class: "quiz-nav",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: !view.can_go_back,
                    onclick: {
                        let controller = Arc::clone(&controller);
                        move |_| {
                            let controller = Arc::clone(&controller);
                            spawn(async move {
                                controller.go_back().await;
                                advisory.set(None);
                                vm.set(QuizVm::read_from(&controller));
                            });
                        }
                    },
                    "Previous"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !view.can_advance,
                    onclick: {
                        let controller = Arc::clone(&controller);
                        move |_| {
                            let controller = Arc::clone(&controller);
                            spawn(async move {
                                controller.advance().await;
                                advisory.set(None);
                                vm.set(QuizVm::read_from(&controller));
                            });
                        }
                    },
                    if view.position == view.total { "Finish" } else { "Next" }
                }
            }

            nav { class: "jump-panel",
                span { class: "jump-label", "Go to:" }
                for entry in view.jump_entries.clone() {
                    button {
                        key: "{entry.index}",
                        class: if entry.current {
                            "jump jump-current"
                        } else if entry.answered {
                            "jump jump-answered"
                        } else {
                            "jump"
                        },
                        r#type: "button",
                        disabled: !entry.answered && !entry.current,
                        onclick: {
                            let controller = Arc::clone(&controller);
                            let target = entry.index;
                            move |_| {
                                let controller = Arc::clone(&controller);
                                spawn(async move {
                                    controller.jump_to(target).await;
                                    advisory.set(None);
                                    vm.set(QuizVm::read_from(&controller));
                                });
                            }
                        },
                        "{entry.number}"
                    }
                }
            }
        }
    }
}
