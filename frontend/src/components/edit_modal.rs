use std::cell::RefCell;
use std::rc::Rc;

use shared::edit_form::{run_email_checks, EmailCheckResult, FieldCheck, SubmitStart};
use shared::{ContactEmailLookup, EditDraft, EditField, EditFormState, EditMode, SubmitOutcome};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, MouseEvent};
use yew::functional::UseForceUpdateHandle;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct EditModalProps {
    pub show: bool,
    pub mode: EditMode,
    /// Record to edit; `None` opens a blank form for a new record
    #[prop_or_default]
    pub record: Option<EditDraft>,
    pub on_save: Callback<EditDraft>,
    pub on_close: Callback<()>,
}

#[function_component(EditModal)]
pub fn edit_modal(props: &EditModalProps) -> Html {
    let form = use_mut_ref(|| EditFormState::new(props.mode));
    let redraw = use_force_update();
    let api_client = ApiClient::new();

    // Re-initialize the draft whenever the modal opens or its record changes
    use_effect_with((props.show, props.mode, props.record.clone()), {
        let form = form.clone();
        let redraw = redraw.clone();
        move |(show, mode, record)| {
            if *show {
                form.borrow_mut().open(*mode, record.clone());
            } else {
                form.borrow_mut().close();
            }
            redraw.force_update();
            || ()
        }
    });

    let close = {
        let form = form.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: ()| {
            form.borrow_mut().close();
            on_close.emit(());
        })
    };

    let on_backdrop_click = {
        let close = close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_cancel = {
        let close = close.clone();
        Callback::from(move |_: MouseEvent| close.emit(()))
    };

    let on_submit = {
        let form = form.clone();
        let redraw = redraw.clone();
        let on_save = props.on_save.clone();
        let api_client = api_client.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let start = form.borrow_mut().begin_submit();
            redraw.force_update();
            let plan = match start {
                SubmitStart::Ready(plan) => plan,
                SubmitStart::Finished(_) => return,
            };

            let form = form.clone();
            let redraw = redraw.clone();
            let on_save = on_save.clone();
            let api_client = api_client.clone();
            spawn_local(async move {
                let results = run_email_checks(&api_client, plan.checks).await;
                let outcome = form.borrow_mut().finish_submit(plan.locally_valid, results);
                redraw.force_update();

                if let SubmitOutcome::Saved(draft) = outcome {
                    Logger::info_with_component(
                        "edit-modal",
                        &format!("Saving {} {}", draft.mode().noun(), draft.id()),
                    );
                    on_save.emit(draft);
                }
            });
        })
    };

    if !props.show {
        return html! {};
    }

    let state = form.borrow();
    let mode = state.mode();
    let title = if state.draft().is_new() {
        format!("New {}", mode.noun())
    } else {
        format!("Edit {}", mode.noun())
    };

    let fields = mode.fields().iter().map(|field| {
        let field = *field;
        let on_input = {
            let form = form.clone();
            let redraw = redraw.clone();
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                form.borrow_mut().set_field(field, input.value());
                redraw.force_update();
            })
        };
        let on_blur = validate_on_blur(field, form.clone(), redraw.clone(), api_client.clone());

        let input_type = match field {
            EditField::Email => "email",
            EditField::Phone => "tel",
            EditField::Website => "url",
            _ => "text",
        };
        let id = format!("edit-{}", field.name());
        let error = state.visible_error(field).map(str::to_string);

        html! {
            <div class={classes!("form-group", error.is_some().then_some("has-error"))}>
                <label for={id.clone()}>
                    {field.label()}
                    {if mode.is_required(field) { html! { <span class="required">{" *"}</span> } } else { html! {} }}
                </label>
                <input
                    id={id}
                    type={input_type}
                    class="edit-modal-input"
                    value={state.draft().value(field).unwrap_or_default().to_string()}
                    oninput={on_input}
                    onblur={on_blur}
                    disabled={state.is_saving()}
                />
                {if field == EditField::Email && state.is_checking_email() {
                    html! { <small class="field-pending">{"Checking email..."}</small> }
                } else { html! {} }}
                {if let Some(error) = error {
                    html! { <small class="field-error">{error}</small> }
                } else { html! {} }}
            </div>
        }
    });

    let view = html! {
        <div class="edit-modal-backdrop" onclick={on_backdrop_click}>
            <div class="edit-modal" onclick={on_modal_click}>
                <div class="edit-modal-content">
                    <h3 class="edit-modal-title">{title}</h3>

                    {if let Some(error) = state.submit_error() {
                        html! { <div class="edit-modal-error">{error}</div> }
                    } else { html! {} }}

                    <form class="edit-modal-form" onsubmit={on_submit}>
                        {for fields}

                        <div class="edit-modal-buttons">
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled={state.is_saving()}
                            >
                                {if state.is_saving() { "Saving..." } else { "Save" }}
                            </button>
                            <button
                                type="button"
                                class="btn btn-secondary"
                                onclick={on_cancel}
                                disabled={state.is_saving()}
                            >
                                {"Cancel"}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    };
    view
}

/// Validate `field` when it loses focus, running the email lookup in the background
fn validate_on_blur(
    field: EditField,
    form: Rc<RefCell<EditFormState>>,
    redraw: UseForceUpdateHandle,
    api_client: ApiClient,
) -> Callback<FocusEvent> {
    Callback::from(move |_: FocusEvent| {
        let check = form.borrow_mut().begin_field_check(field);
        redraw.force_update();

        if let FieldCheck::Uniqueness(check) = check {
            let form = form.clone();
            let redraw = redraw.clone();
            let api_client = api_client.clone();
            spawn_local(async move {
                let result = api_client.email_exists(check.email()).await;
                if let Err(e) = &result {
                    Logger::warn_with_component(
                        "edit-modal",
                        &format!("Email check failed: {}", e),
                    );
                }
                form.borrow_mut()
                    .finish_email_check(EmailCheckResult { check, result });
                redraw.force_update();
            });
        }
    })
}
