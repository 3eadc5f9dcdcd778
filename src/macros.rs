/// Match a `Result` into its inner value or
/// return `500 Internal Server Error` with the error as a JSON message,
/// or some other provided status using the second variant of this macro.
macro_rules! try_handler {
    ( $e:expr ) => {
        match $e {
            Ok(x) => x,
            Err(e) => {
                error!("request failed: {}", e);
                return Ok(::iron::Response::with((::iron::status::InternalServerError,
                                                  $crate::handlers::error_body(&e.to_string()))));
            }
        }
    };
    ( $e:expr, $error:expr ) => {
        match $e {
            Ok(x) => x,
            Err(e) => return Ok(::iron::Response::with(($error, $crate::handlers::error_body(&e.to_string()))))
        }
    }
}

/// Lock a `Mutex`. The locks in this crate guard no data of their own,
/// so a poisoned lock is simply taken over.
macro_rules! lock {
    ( $e:expr ) => { $e.lock().unwrap_or_else(::std::sync::PoisonError::into_inner) }
}

/// Get the value of a parameter in the URI.
/// If the parameter was absent, return `400 Bad Request`.
/// If we could not obtain the parameter list, return `500 Internal Server Error`.
macro_rules! get_http_param {
    ( $r:expr, $e:expr ) => {
        match $r.extensions.get::<::router::Router>() {
            Some(router) => {
                match router.find($e) {
                    Some(val) => val,
                    None => return Ok(::iron::Response::with(::iron::status::BadRequest)),
                }
            }
            None => return Ok(::iron::Response::with(::iron::status::InternalServerError)),
        }
    }
}
