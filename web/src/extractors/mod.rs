pub(crate) mod hx_request;
