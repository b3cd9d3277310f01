pub mod state;

use self::state::{
    get_bills, handle_click_icon_eye, handle_click_new_bill, rows_for_display, BillRow,
    BillsState, ReceiptPreview,
};
use crate::routes::routes::use_navigator;
use crate::shared::api_utils::file_url;
use crate::shared::icons::icon;
use crate::shared::modal::ReceiptModal;
use crate::shared::store::use_store;
use crate::system::pages::error::ErrorPage;
use crate::system::pages::loading::LoadingPage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

fn eye_url(ev: &leptos::ev::MouseEvent) -> String {
    ev.current_target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.get_attribute("data-bill-url"))
        .unwrap_or_default()
}

#[component]
fn BillsTable(rows: Vec<BillRow>, preview: RwSignal<Option<ReceiptPreview>>) -> impl IntoView {
    let rows = rows_for_display(rows);

    view! {
        <table class="table">
            <thead>
                <tr>
                    <th>"Type"</th>
                    <th>"Nom"</th>
                    <th>"Date"</th>
                    <th>"Montant"</th>
                    <th>"Statut"</th>
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody data-testid="tbody">
                {rows
                    .into_iter()
                    .map(|row| {
                        let url = row.file_url.as_deref().map(file_url).unwrap_or_default();
                        view! {
                            <tr>
                                <td>{row.expense_type}</td>
                                <td>{row.name}</td>
                                <td>{row.date}</td>
                                <td>{format!("{} €", row.amount)}</td>
                                <td>{row.status}</td>
                                <td>
                                    <div
                                        class="icon-actions"
                                        data-testid="icon-eye"
                                        data-bill-url=url
                                        on:click=move |ev| preview.set(handle_click_icon_eye(&eye_url(&ev)))
                                    >
                                        {icon("eye")}
                                    </div>
                                </td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}

#[component]
#[allow(non_snake_case)]
pub fn BillsPage() -> impl IntoView {
    let navigator = use_navigator();
    let store = use_store();
    let state = RwSignal::new(BillsState::default());
    let preview = RwSignal::new(None::<ReceiptPreview>);

    spawn_local(async move {
        match get_bills(store.as_ref()).await {
            Ok(rows) => state.set(BillsState::Loaded(rows)),
            Err(e) => {
                log::error!("Failed to load bills: {}", e);
                state.set(BillsState::Failed(e));
            }
        }
    });

    view! {
        <div class="content-header">
            <div class="content-title">"Mes notes de frais"</div>
            <button
                type="button"
                data-testid="btn-new-bill"
                class="btn btn-primary"
                on:click=move |_| handle_click_new_bill(|route| navigator.navigate(route))
            >
                "Nouvelle note de frais"
            </button>
        </div>
        <div id="data-table">
            {move || match state.get() {
                BillsState::Loading => view! { <LoadingPage /> }.into_any(),
                BillsState::Failed(e) => view! { <ErrorPage message={e.to_string()} /> }.into_any(),
                BillsState::Loaded(rows) => view! { <BillsTable rows=rows preview=preview /> }.into_any(),
            }}
        </div>
        {move || {
            preview
                .get()
                .map(|p| {
                    view! { <ReceiptModal url={p.url} on_close={Callback::new(move |_| preview.set(None))} /> }
                })
        }}
    }
}
