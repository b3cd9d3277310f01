use super::view_model::{handle_submit, upload_receipt, NewBillViewModel};
use crate::routes::routes::use_navigator;
use crate::shared::store::use_store;
use crate::system::auth::storage;
use contracts::domain::a001_bill::aggregate::ExpenseType;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[component]
pub fn NewBillPage() -> impl IntoView {
    let navigator = use_navigator();
    let store = use_store();
    let vm = RwSignal::new(NewBillViewModel::new());
    let email = storage::get_session_user()
        .and_then(|u| u.email)
        .unwrap_or_default();

    let upload_store = store.clone();
    let on_change_file = move |ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        let accepted = vm
            .try_update(|v| v.handle_change_file(&file.name(), alert))
            .unwrap_or(false);
        if !accepted {
            input.set_value("");
            return;
        }

        let selection = vm.with_untracked(|v| v.selection());
        let store = upload_store.clone();
        let email = email.clone();
        spawn_local(async move {
            let bytes = match read_file(&file).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::error!("Failed to read receipt: {}", e);
                    return;
                }
            };
            let Some(upload) = vm.with_untracked(|v| v.upload_request(selection, &email, bytes))
            else {
                return;
            };
            match upload_receipt(store.as_ref(), upload).await {
                Ok(receipt) => vm.update(|v| {
                    v.apply_upload(selection, receipt);
                }),
                Err(e) => {
                    log::error!("Receipt upload failed: {}", e);
                    vm.update(|v| v.apply_upload_error(selection, e.to_string()));
                }
            }
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let request = match vm.with_untracked(|v| v.submit_request()) {
            Ok(request) => request,
            Err(message) => {
                vm.update(|v| v.error = Some(message));
                return;
            }
        };

        let store = store.clone();
        spawn_local(async move {
            if let Err(e) = handle_submit(store.as_ref(), request, |route| navigator.navigate(route)).await {
                log::error!("Failed to submit bill: {}", e);
                vm.update(|v| v.error = Some(e.to_string()));
            }
        });
    };

    view! {
        <div class="form-newbill-container content-inner">
            <div class="row">
                <h3>"Envoyer une note de frais"</h3>
            </div>
            <form data-testid="form-new-bill" on:submit=on_submit>
                <div class="row">
                    <div class="col-md-6">
                        <div class="col-half">
                            <label for="expense-type">"Type de dépense"</label>
                            <select
                                required
                                class="form-control blue-border"
                                data-testid="expense-type"
                                on:change=move |ev| {
                                    if let Some(t) = ExpenseType::from_label(&event_target_value(&ev)) {
                                        vm.update(|v| v.form.expense_type = t);
                                    }
                                }
                            >
                                {ExpenseType::ALL
                                    .iter()
                                    .map(|t| view! { <option value={t.label()}>{t.label()}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="col-half">
                            <label for="expense-name">"Nom de la dépense"</label>
                            <input
                                type="text"
                                class="form-control blue-border"
                                data-testid="expense-name"
                                placeholder="Vol Paris Londres"
                                prop:value=move || vm.with(|v| v.form.name.clone())
                                on:input=move |ev| vm.update(|v| v.form.name = event_target_value(&ev))
                            />
                        </div>
                        <div class="col-half">
                            <label for="datepicker">"Date"</label>
                            <input
                                required
                                type="date"
                                class="form-control blue-border"
                                data-testid="datepicker"
                                prop:value=move || vm.with(|v| v.form.date.clone())
                                on:input=move |ev| vm.update(|v| v.form.date = event_target_value(&ev))
                            />
                        </div>
                        <div class="col-half">
                            <label for="amount">"Montant TTC"</label>
                            <input
                                required
                                type="number"
                                class="form-control blue-border input-icon input-icon-right"
                                data-testid="amount"
                                placeholder="348"
                                prop:value=move || vm.with(|v| v.form.amount.clone())
                                on:input=move |ev| vm.update(|v| v.form.amount = event_target_value(&ev))
                            />
                        </div>
                        <div class="col-half-row">
                            <div class="flex-col">
                                <label for="vat">"TVA"</label>
                                <input
                                    type="number"
                                    class="form-control blue-border"
                                    data-testid="vat"
                                    placeholder="70"
                                    prop:value=move || vm.with(|v| v.form.vat.clone())
                                    on:input=move |ev| vm.update(|v| v.form.vat = event_target_value(&ev))
                                />
                            </div>
                            <div class="flex-col">
                                <input
                                    required
                                    type="number"
                                    class="form-control blue-border"
                                    data-testid="pct"
                                    placeholder="20"
                                    prop:value=move || vm.with(|v| v.form.pct.clone())
                                    on:input=move |ev| vm.update(|v| v.form.pct = event_target_value(&ev))
                                />
                            </div>
                        </div>
                    </div>
                    <div class="col-md-6">
                        <div class="col-half">
                            <label for="commentary">"Commentaire"</label>
                            <textarea
                                class="form-control blue-border"
                                data-testid="commentary"
                                rows="3"
                                prop:value=move || vm.with(|v| v.form.commentary.clone())
                                on:input=move |ev| vm.update(|v| v.form.commentary = event_target_value(&ev))
                            ></textarea>
                        </div>
                        <div class="col-half">
                            <label for="file">"Justificatif"</label>
                            <input
                                required
                                type="file"
                                accept=".jpg,.jpeg,.png"
                                class="form-control blue-border"
                                data-testid="file"
                                on:change=on_change_file
                            />
                        </div>
                    </div>
                </div>
                <Show when=move || vm.with(|v| v.error.is_some())>
                    <div class="error-message">
                        {move || vm.with(|v| v.error.clone().unwrap_or_default())}
                    </div>
                </Show>
                <div class="row">
                    <div class="col-md-6">
                        <div class="col-half">
                            <button type="submit" id="btn-send-bill" class="btn btn-primary">
                                "Envoyer"
                            </button>
                        </div>
                    </div>
                </div>
            </form>
        </div>
    }
}
