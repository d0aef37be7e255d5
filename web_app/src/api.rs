//! REST client for the channel server.
//!
//! Every call returns `Result<_, ApiError>`; non-2xx bodies are normalized
//! through [`ApiError::from_http`] so callers can show one line of text.

use gloo_net::http::{Request, RequestBuilder, Response};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use web_common::{mutation_body, ActionResponse, ApiError, FormBody};
use web_sys::{File, FormData, UrlSearchParams};

/// Handle to the server API. Cheap to copy into closures.
#[derive(Clone, Copy)]
pub struct ApiClient {
    base: StoredValue<String>,
}

impl ApiClient {
    pub fn new(base: &str) -> Self {
        Self { base: StoredValue::new(base.trim_end_matches('/').to_string()) }
    }

    /// Absolute URL for a server path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.get_value(), path)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        log::debug!("GET {}", path);
        let builder = Request::get(&self.url(path))
            .query(query.iter().map(|(k, v)| (*k, v.as_str())));
        let response = send(builder.build()).await?;
        read_json(response).await
    }

    /// POST a form request, encoded the way its endpoint expects.
    pub async fn submit<F: FormBody>(&self, form: &F) -> Result<ActionResponse, ApiError> {
        log::debug!("POST {}", F::PATH);
        let builder = Request::post(&self.url(F::PATH));
        let request = if F::MULTIPART {
            let data = form_data(&form.fields())?;
            builder.body(data)
        } else {
            builder.body(url_params(&form.fields())?)
        };
        read_action(send(request).await?).await
    }

    /// POST with no body.
    pub async fn post_empty(&self, path: &str) -> Result<ActionResponse, ApiError> {
        log::debug!("POST {}", path);
        read_action(send(Request::post(&self.url(path)).build()).await?).await
    }

    /// Multipart upload with the file under the `file` field.
    pub async fn upload(&self, path: &str, file: &File) -> Result<ActionResponse, ApiError> {
        log::debug!("POST {} ({})", path, file.name());
        let data = FormData::new().map_err(js_error)?;
        data.append_with_blob_and_filename("file", file, &file.name())
            .map_err(js_error)?;
        read_action(send(Request::post(&self.url(path)).body(data)).await?).await
    }

    /// JSON POST. Mutating calls may answer with an empty body.
    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        log::debug!("POST {}", path);
        self.send_json(Request::post(&self.url(path)), body).await
    }

    pub async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        log::debug!("PUT {}", path);
        self.send_json(Request::put(&self.url(path)), body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        log::debug!("DELETE {}", path);
        read_mutation(send(Request::delete(&self.url(path)).build()).await?).await
    }

    async fn send_json<B: Serialize>(&self, builder: RequestBuilder, body: &B) -> Result<Value, ApiError> {
        read_mutation(send(builder.json(body)).await?).await
    }
}

async fn send(request: Result<Request, gloo_net::Error>) -> Result<Response, ApiError> {
    let request = request.map_err(|e| ApiError::Network(e.to_string()))?;
    let response = request.send().await.map_err(|e| {
        log::error!("Request failed: {}", e);
        ApiError::Network(e.to_string())
    })?;
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let err = ApiError::from_http(status, &body);
    log::warn!("{} {}: {}", status, response.url(), err.message());
    Err(err)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

async fn read_mutation(response: Response) -> Result<Value, ApiError> {
    let body = response.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;
    mutation_body(&body)
}

async fn read_action(response: Response) -> Result<ActionResponse, ApiError> {
    let body = response.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;
    ActionResponse::from_body(&body)
}

fn form_data(fields: &[(&'static str, String)]) -> Result<FormData, ApiError> {
    let data = FormData::new().map_err(js_error)?;
    for (name, value) in fields {
        data.append_with_str(name, value).map_err(js_error)?;
    }
    Ok(data)
}

fn url_params(fields: &[(&'static str, String)]) -> Result<UrlSearchParams, ApiError> {
    let params = UrlSearchParams::new().map_err(js_error)?;
    for (name, value) in fields {
        params.append(name, value);
    }
    Ok(params)
}

fn js_error(err: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Network(format!("{:?}", err))
}
