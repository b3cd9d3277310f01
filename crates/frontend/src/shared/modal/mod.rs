use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

/// Close the modal when `key` is Escape. Returns false when the key is
/// another one or when `on_close` has already been disposed with its owner.
pub fn close_on_escape(key: &str, on_close: Callback<()>) -> bool {
    key == "Escape" && on_close.try_run(()).is_some()
}

#[component]
pub fn Modal(
    /// Title of the modal
    #[prop(into)]
    title: String,
    /// Callback when modal should close
    on_close: Callback<()>,
    /// Value of the `data-testid` attribute on the dialog
    #[prop(optional, into)]
    test_id: String,
    /// Modal content
    children: Children,
) -> impl IntoView {
    let escape = window_event_listener(ev::keydown, move |ev: ev::KeyboardEvent| {
        close_on_escape(&ev.key(), on_close);
    });
    on_cleanup(move || escape.remove());

    let stop_propagation = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" data-testid=test_id role="dialog" on:click=stop_propagation>
                <div class="modal-header">
                    <h2 class="modal-title">{title}</h2>
                    <button class="button button--icon modal__close" on:click=move |_| on_close.run(())>
                        {icon("x")}
                    </button>
                </div>
                <div class="modal-body">
                    {children()}
                </div>
            </div>
        </div>
    }
}

/// Receipt preview opened from the eye icon of a bill row
#[component]
pub fn ReceiptModal(
    /// Absolute URL of the receipt image
    url: String,
    on_close: Callback<()>,
) -> impl IntoView {
    view! {
        <Modal title="Justificatif" test_id="modaleFile" on_close=on_close>
            <div class="bill-proof-container">
                <img width="100%" src=url alt="Bill" />
            </div>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_escape_closes_only_while_modal_is_alive() {
        let owner = Owner::new();
        owner.set();
        let modal_owner = owner.child();

        let closed = Arc::new(AtomicUsize::new(0));
        let on_close = modal_owner.with(|| {
            let closed = Arc::clone(&closed);
            Callback::new(move |_| {
                closed.fetch_add(1, Ordering::SeqCst);
            })
        });

        assert!(!close_on_escape("Enter", on_close));
        assert!(close_on_escape("Escape", on_close));
        assert_eq!(closed.load(Ordering::SeqCst), 1);

        // Modal unmounted: a late Escape must be a no-op
        modal_owner.cleanup();
        assert!(!close_on_escape("Escape", on_close));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }
}
