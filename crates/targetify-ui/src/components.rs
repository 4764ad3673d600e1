use chrono::Local;
use targetify_core::{Summary, Target, Variant};
use web_sys::HtmlInputElement;
use yew::{Callback, Html, Properties, TargetCast, classes, function_component, html};

use crate::toast::Toast;

#[derive(Properties, PartialEq)]
pub struct TargetFormProps {
    pub draft: String,
    pub on_input: Callback<String>,
    pub on_submit: Callback<()>,
}

#[function_component(TargetForm)]
pub fn target_form(props: &TargetFormProps) -> Html {
    let on_input = props.on_input.clone();
    let on_submit = props.on_submit.clone();

    html! {
        <form
            class="target-form"
            onsubmit={move |e: yew::SubmitEvent| {
                e.prevent_default();
                on_submit.emit(());
            }}
        >
            <input
                type="text"
                placeholder="What do you want to get done today?"
                value={props.draft.clone()}
                oninput={move |e: yew::InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    on_input.emit(input.value());
                }}
            />
            <button type="submit" class="btn primary">{ "Add" }</button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct TargetListProps {
    pub targets: Vec<Target>,
    pub on_toggle: Callback<String>,
    pub on_delete: Callback<String>,
}

#[function_component(TargetList)]
pub fn target_list(props: &TargetListProps) -> Html {
    if props.targets.is_empty() {
        return html! {
            <div class="panel empty">
                { "No targets yet. Add one above to start your day." }
            </div>
        };
    }

    html! {
        <ul class="panel target-list">
            {
                for props.targets.iter().map(|target| {
                    let toggle_id = target.id.clone();
                    let delete_id = target.id.clone();
                    let on_toggle = props.on_toggle.clone();
                    let on_delete = props.on_delete.clone();
                    let created = target
                        .created_at
                        .with_timezone(&Local)
                        .format("%b %-d, %H:%M")
                        .to_string();

                    html! {
                        <li key={target.id.clone()} class={classes!("row", target.completed.then_some("done"))}>
                            <input
                                type="checkbox"
                                checked={target.completed}
                                onclick={move |_| on_toggle.emit(toggle_id.clone())}
                            />
                            <div class="text">
                                <div>{ &target.text }</div>
                                <div class="meta">{ created }</div>
                            </div>
                            <button
                                class="btn ghost"
                                title="Delete target"
                                onclick={move |_| on_delete.emit(delete_id.clone())}
                            >
                                { "✕" }
                            </button>
                        </li>
                    }
                })
            }
        </ul>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProgressSummaryProps {
    pub summary: Summary,
    pub on_clear: Callback<()>,
}

#[function_component(ProgressSummary)]
pub fn progress_summary(props: &ProgressSummaryProps) -> Html {
    let summary = props.summary;
    let on_clear = props.on_clear.clone();
    let width = format!("width:{}%;", summary.completion_percentage);

    html! {
        <div class="panel summary">
            <div class="counts">
                { format!("{} of {} done, {} left", summary.completed_count, summary.total_count, summary.remaining()) }
                <span class="badge">{ format!("{}%", summary.completion_percentage) }</span>
            </div>
            <div class="progress"><div class="bar" style={width}></div></div>
            <button
                class="btn"
                disabled={summary.completed_count == 0}
                onclick={move |_| on_clear.emit(())}
            >
                { "Clear completed" }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct InstallBannerProps {
    pub busy: bool,
    pub on_install: Callback<()>,
    pub on_dismiss: Callback<()>,
}

#[function_component(InstallBanner)]
pub fn install_banner(props: &InstallBannerProps) -> Html {
    let on_install = props.on_install.clone();
    let on_dismiss = props.on_dismiss.clone();

    html! {
        <div class="install-banner" role="dialog">
            <div>
                <strong>{ "Install Targetify" }</strong>
                <div class="meta">{ "Add it to your home screen for quick access." }</div>
            </div>
            <button
                class="btn primary"
                disabled={props.busy}
                onclick={move |_| on_install.emit(())}
            >
                { if props.busy { "Installing…" } else { "Install" } }
            </button>
            <button
                class="btn ghost"
                title="Close"
                disabled={props.busy}
                onclick={move |_| on_dismiss.emit(())}
            >
                { "✕" }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    html! {
        <div class="toasts" aria-live="polite">
            {
                for props.toasts.iter().map(|toast| {
                    let id = toast.id;
                    let on_dismiss = props.on_dismiss.clone();
                    let class = match toast.notification.variant {
                        Variant::Default => "toast",
                        Variant::Destructive => "toast destructive",
                    };

                    html! {
                        <div key={id} class={class} onclick={move |_| on_dismiss.emit(id)}>
                            <div class="title">{ &toast.notification.title }</div>
                            <div>{ &toast.notification.description }</div>
                        </div>
                    }
                })
            }
        </div>
    }
}
