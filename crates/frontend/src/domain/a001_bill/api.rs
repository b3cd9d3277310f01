//! HTTP implementation of the store client.

use async_trait::async_trait;
use contracts::domain::a001_bill::aggregate::{Bill, BillDto, UploadedReceipt};
use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use web_sys::{Blob, BlobPropertyBag, FormData};

use crate::shared::api_utils::api_url;
use crate::shared::store::{BillsStore, ReceiptUpload, Store, StoreError};
use crate::system::auth::storage;

/// Store backed by the REST API
#[derive(Default)]
pub struct HttpStore {
    bills: HttpBillsStore,
}

impl Store for HttpStore {
    fn bills(&self) -> &dyn BillsStore {
        &self.bills
    }
}

#[derive(Default)]
pub struct HttpBillsStore;

fn with_auth(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_jwt() {
        Some(jwt) => builder.header("Authorization", &format!("Bearer {}", jwt)),
        None => builder,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    if !response.ok() {
        log::warn!("{} answered {}", response.url(), response.status());
        return Err(StoreError::from_status(response.status()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

fn js_error(e: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Network(format!("{:?}", e))
}

fn upload_form(upload: &ReceiptUpload) -> Result<FormData, StoreError> {
    let bytes = js_sys::Uint8Array::from(upload.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let props = BlobPropertyBag::new();
    props.set_type(&upload.content_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props).map_err(js_error)?;

    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("file", &blob, &upload.file_name)
        .map_err(js_error)?;
    form.append_with_str("email", &upload.email)
        .map_err(js_error)?;
    Ok(form)
}

#[async_trait(?Send)]
impl BillsStore for HttpBillsStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        let response = with_auth(gloo_net::http::Request::get(&api_url("/api/bills")))
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        read_json(response).await
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<UploadedReceipt, StoreError> {
        let form = upload_form(&upload)?;
        let response = with_auth(gloo_net::http::Request::post(&api_url("/api/bills")))
            .body(form)
            .map_err(|e| StoreError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        read_json(response).await
    }

    async fn update(&self, id: &str, dto: &BillDto) -> Result<Bill, StoreError> {
        let url = api_url(&format!("/api/bills/{}", id));
        let response = with_auth(gloo_net::http::Request::patch(&url))
            .json(dto)
            .map_err(|e| StoreError::Decode(e.to_string()))?
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        read_json(response).await
    }
}
