pub mod state;

use self::state::{handle_decision, load_groups, DashboardState, StatusGroup};
use crate::shared::api_utils::file_url;
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::modal::ReceiptModal;
use crate::shared::store::use_store;
use crate::system::pages::error::ErrorPage;
use crate::system::pages::loading::LoadingPage;
use contracts::domain::a001_bill::aggregate::{Bill, BillStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
fn StatusSection(
    index: usize,
    group: StatusGroup,
    selected: RwSignal<Option<Bill>>,
) -> impl IntoView {
    let open = RwSignal::new(false);
    let title = format!("{} ({})", group.status.label(), group.count());
    let bills = group.bills;

    view! {
        <div class="status-bills-header" on:click=move |_| open.update(|o| *o = !*o)>
            <h3>{title}</h3>
            <span id={format!("arrow-icon{}", index + 1)} class:open=move || open.get()>"▾"</span>
        </div>
        <Show when=move || open.get()>
            <div class="status-bills-container" id={format!("status-bills-container{}", index + 1)}>
                {bills
                    .iter()
                    .cloned()
                    .map(|bill| {
                        let id = bill.to_string_id();
                        let card_id = id.clone();
                        let label = bill.email.clone();
                        let name = bill.name.clone();
                        let date = format_date(&bill.date);
                        let amount = format!("{} €", bill.amount);
                        let expense_type = bill.expense_type.map(|t| t.label()).unwrap_or_default();
                        view! {
                            <div
                                class="bill-card"
                                id={format!("open-bill{}", id)}
                                class:selected-card=move || {
                                    selected.with(|s| s.as_ref().map(|b| b.to_string_id()) == Some(card_id.clone()))
                                }
                                on:click=move |_| selected.set(Some(bill.clone()))
                            >
                                <div class="bill-card-name-container">
                                    <div class="bill-card-grey">{label}</div>
                                    <span class="bill-card-grey">{name}</span>
                                </div>
                                <div class="name-price-container">
                                    <span>{amount}</span>
                                </div>
                                <div class="date-type-container">
                                    <span>{date}</span>
                                    <span>{expense_type}</span>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </Show>
    }
}

#[component]
fn BillDetails(
    bill: Bill,
    on_decide: Callback<(BillStatus, String)>,
) -> impl IntoView {
    let comment = RwSignal::new(bill.comment_admin.clone().unwrap_or_default());
    let preview = RwSignal::new(None::<String>);
    let receipt = bill.file_url.as_deref().map(file_url);
    let pending = bill.status == BillStatus::Pending;

    view! {
        <div class="dashboard-form" data-testid="dashboard-form">
            <div class="row">
                <div class="col-md-6">
                    <label>"Type de dépense"</label>
                    <div class="input-field">
                        {bill.expense_type.map(|t| t.label()).unwrap_or_default()}
                    </div>
                    <label>"Nom de la dépense"</label>
                    <div class="input-field">{bill.name.clone()}</div>
                    <label>"Date"</label>
                    <div class="input-field">{format_date(&bill.date)}</div>
                </div>
                <div class="col-md-6">
                    <label>"Commentaire"</label>
                    <div class="textarea-field">{bill.commentary.clone()}</div>
                </div>
            </div>
            <div class="row">
                <div class="col-md-6">
                    <label>"Montant TTC"</label>
                    <div class="input-field">{format!("{} €", bill.amount)}</div>
                    <label>"TVA"</label>
                    <div class="input-field">{format!("{} € ({} %)", bill.vat, bill.pct)}</div>
                </div>
                <div class="col-md-6">
                    <label>"Justificatif"</label>
                    <div class="input-field input-flex">
                        <span>{bill.file_name.clone().unwrap_or_default()}</span>
                        {receipt
                            .map(|url| {
                                view! {
                                    <span
                                        data-testid="icon-eye-d"
                                        on:click=move |_| preview.set(Some(url.clone()))
                                    >
                                        {icon("eye")}
                                    </span>
                                }
                            })}
                    </div>
                </div>
            </div>
            <Show
                when=move || pending
                fallback=move || {
                    view! {
                        <div class="input-field">
                            {move || comment.get()}
                        </div>
                    }
                }
            >
                <div class="row">
                    <label for="commentary2">"Ajouter un commentaire"</label>
                    <textarea
                        id="commentary2"
                        data-testid="commentary2"
                        prop:value=move || comment.get()
                        on:input=move |ev| comment.set(event_target_value(&ev))
                    ></textarea>
                </div>
                <div class="row">
                    <button
                        type="button"
                        id="btn-refuse-bill"
                        data-testid="btn-refuse-bill-d"
                        class="btn btn-primary"
                        on:click=move |_| on_decide.run((BillStatus::Refused, comment.get_untracked()))
                    >
                        "Refuser"
                    </button>
                    <button
                        type="button"
                        id="btn-accept-bill"
                        data-testid="btn-accept-bill-d"
                        class="btn btn-primary"
                        on:click=move |_| on_decide.run((BillStatus::Accepted, comment.get_untracked()))
                    >
                        "Accepter"
                    </button>
                </div>
            </Show>
            {move || {
                preview
                    .get()
                    .map(|url| {
                        view! { <ReceiptModal url=url on_close={Callback::new(move |_| preview.set(None))} /> }
                    })
            }}
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let store = use_store();
    let state = RwSignal::new(DashboardState::default());
    let selected = RwSignal::new(None::<Bill>);
    let reload = RwSignal::new(0u32);

    let load_store = store.clone();
    Effect::new(move |_| {
        reload.track();
        let store = load_store.clone();
        spawn_local(async move {
            match load_groups(store.as_ref()).await {
                Ok(groups) => state.set(DashboardState::Loaded(groups)),
                Err(e) => {
                    log::error!("Failed to load dashboard: {}", e);
                    state.set(DashboardState::Failed(e));
                }
            }
        });
    });

    let on_decide = Callback::new(move |(status, comment): (BillStatus, String)| {
        let Some(bill) = selected.get_untracked() else {
            return;
        };
        let store = store.clone();
        spawn_local(async move {
            match handle_decision(store.as_ref(), &bill, status, &comment).await {
                Ok(_) => {
                    selected.set(None);
                    reload.update(|n| *n += 1);
                }
                Err(e) => {
                    log::error!("Failed to review bill {}: {}", bill.to_string_id(), e);
                    state.set(DashboardState::Failed(e));
                }
            }
        });
    });

    view! {
        <div class="dashboard-content">
            <div class="bills-feed">
                {move || match state.get() {
                    DashboardState::Loading => view! { <LoadingPage /> }.into_any(),
                    DashboardState::Failed(e) => view! { <ErrorPage message={e.to_string()} /> }.into_any(),
                    DashboardState::Loaded(groups) => groups
                        .into_iter()
                        .enumerate()
                        .map(|(index, group)| {
                            view! { <StatusSection index=index group=group selected=selected /> }
                        })
                        .collect_view()
                        .into_any(),
                }}
            </div>
            <div class="dashboard-right-container">
                {move || match selected.get() {
                    Some(bill) => view! { <BillDetails bill=bill on_decide=on_decide /> }.into_any(),
                    None => view! {
                        <div id="big-billed-icon" data-testid="big-billed-icon">
                            "Sélectionnez une note de frais"
                        </div>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}
