use crate::build::BuildError;
use crate::model::Environment;
use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

pub fn route_request(method: &str, path: &str, body: &str, env: &Environment) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/weapons") => match api::weapons_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", path) if path.starts_with("/api/weapons/") => {
            let name = path.trim_start_matches("/api/weapons/");
            api_response(api::weapon_detail_payload(name))
        }
        ("POST", "/api/evaluate") => api_response(api::evaluate_payload(body, env)),
        ("POST", "/api/validate") => api_response(api::validate_payload(body)),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn api_response(result: Result<String, api::ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(api::ApiError::Parse(err)) => {
            error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
        }
        Err(api::ApiError::Build(err @ BuildError::UnknownWeapon(_))) => {
            error_response(404, "Not Found", &err.to_string())
        }
        Err(api::ApiError::Build(err)) => error_response(400, "Bad Request", &err.to_string()),
        Err(api::ApiError::InvalidBuild(report)) => validation_error_response(
            400,
            "Bad Request",
            api::ValidationErrorResponse::new(report),
        ),
        Err(err @ api::ApiError::Serialize(_)) => {
            error_response(500, "Internal Server Error", &err.to_string())
        }
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_route_is_not_found() {
        let response = route_request("GET", "/api/officers", "", &Environment::default());
        assert_eq!(response.status_code, 404);
    }

    #[test]
    fn http_string_carries_length() {
        let response = route_request("GET", "/api/health", "", &Environment::default());
        let raw = response.to_http_string();
        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(raw.contains(&format!("Content-Length: {}\r\n", response.body.len())));
    }
}
