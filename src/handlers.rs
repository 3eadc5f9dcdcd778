use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;

use iron::headers::ContentType;
use iron::mime::{Mime, SubLevel, TopLevel};
use iron::modifiers::RedirectRaw;
use iron::{status, AfterMiddleware, Handler, IronResult, Request, Response};
use router::Router;
use rustc_serialize::json::{Json, ToJson};

use crate::error::FormError;
use crate::forms::{FieldErrors, PostForm};
use crate::store::Store;

pub struct Handlers {
    pub list: ListHandler,
    pub add_form: AddFormHandler,
    pub add_post: AddPostHandler,
    pub edit_form: EditFormHandler,
    pub update_post: UpdatePostHandler,
    pub delete_post: DeletePostHandler,
    pub like_post: LikePostHandler,
}

impl Handlers {
    pub fn new(store: Arc<Store>) -> Handlers {
        Handlers {
            list: ListHandler::new(store.clone()),
            add_form: AddFormHandler,
            add_post: AddPostHandler::new(store.clone()),
            edit_form: EditFormHandler::new(store.clone()),
            update_post: UpdatePostHandler::new(store.clone()),
            delete_post: DeletePostHandler::new(store.clone()),
            like_post: LikePostHandler::new(store),
        }
    }
}

/// All routes of the application, backed by `store`.
pub fn routes(store: Arc<Store>) -> Router {
    let handlers = Handlers::new(store);

    let mut router = Router::new();
    router.get("/", handlers.list, "list");
    router.get("/add", handlers.add_form, "add_form");
    router.post("/add", handlers.add_post, "add_post");
    router.get("/update/:id", handlers.edit_form, "edit_form");
    router.post("/update/:id", handlers.update_post, "update_post");
    router.post("/delete/:id", handlers.delete_post, "delete_post");
    router.post("/like/:id", handlers.like_post, "like_post");
    router
}

pub struct ListHandler {
    store: Arc<Store>,
}

impl ListHandler {
    fn new(store: Arc<Store>) -> ListHandler {
        ListHandler { store: store }
    }
}

impl Handler for ListHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        let posts = self.store.load_posts();
        let payload = Json::Array(posts.iter().map(ToJson::to_json).collect());
        Ok(Response::with((status::Ok, payload.to_string())))
    }
}

pub struct AddFormHandler;

impl Handler for AddFormHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        Ok(form_view(status::Ok, &PostForm::default(), &FieldErrors::new()))
    }
}

pub struct AddPostHandler {
    store: Arc<Store>,
}

impl AddPostHandler {
    fn new(store: Arc<Store>) -> AddPostHandler {
        AddPostHandler { store: store }
    }
}

impl Handler for AddPostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let form = try_handler!(read_form(req), status::BadRequest);
        if let Err(errors) = form.validate() {
            return Ok(form_view(status::UnprocessableEntity, &form, &errors));
        }

        let post = try_handler!(self.store.add_post(&form.author, &form.title, &form.content));
        info!("added post {}", post.id());
        Ok(redirect_to_list())
    }
}

pub struct EditFormHandler {
    store: Arc<Store>,
}

impl EditFormHandler {
    fn new(store: Arc<Store>) -> EditFormHandler {
        EditFormHandler { store: store }
    }
}

impl Handler for EditFormHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let post_id = get_http_param!(req, "id");

        match self.store.find_post(post_id) {
            Some(post) => Ok(form_view(status::Ok, &PostForm::from_post(&post), &FieldErrors::new())),
            None => Ok(not_found()),
        }
    }
}

pub struct UpdatePostHandler {
    store: Arc<Store>,
}

impl UpdatePostHandler {
    fn new(store: Arc<Store>) -> UpdatePostHandler {
        UpdatePostHandler { store: store }
    }
}

impl Handler for UpdatePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let post_id = get_http_param!(req, "id").to_string();

        let form = try_handler!(read_form(req), status::BadRequest);
        if let Err(errors) = form.validate() {
            return Ok(form_view(status::UnprocessableEntity, &form, &errors));
        }

        if try_handler!(self.store.update_post(&post_id, &form.author, &form.title, &form.content)) {
            info!("updated post {}", post_id);
            Ok(redirect_to_list())
        } else {
            Ok(not_found())
        }
    }
}

pub struct DeletePostHandler {
    store: Arc<Store>,
}

impl DeletePostHandler {
    fn new(store: Arc<Store>) -> DeletePostHandler {
        DeletePostHandler { store: store }
    }
}

impl Handler for DeletePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let post_id = get_http_param!(req, "id");

        if try_handler!(self.store.delete_post(post_id)) {
            info!("deleted post {}", post_id);
            Ok(redirect_to_list())
        } else {
            Ok(not_found())
        }
    }
}

pub struct LikePostHandler {
    store: Arc<Store>,
}

impl LikePostHandler {
    fn new(store: Arc<Store>) -> LikePostHandler {
        LikePostHandler { store: store }
    }
}

impl Handler for LikePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let post_id = get_http_param!(req, "id");

        if try_handler!(self.store.like_post(post_id)) {
            info!("liked post {}", post_id);
            Ok(redirect_to_list())
        } else {
            Ok(not_found())
        }
    }
}

pub struct JsonAfterMiddleware;

impl AfterMiddleware for JsonAfterMiddleware {
    fn after(&self, _: &mut Request, mut res: Response) -> IronResult<Response> {
        res.headers.set(ContentType::json());
        Ok(res)
    }
}

/// `{"error": message}`
pub fn error_body(message: &str) -> String {
    let mut object = BTreeMap::new();
    object.insert("error".to_string(), message.to_json());
    Json::Object(object).to_string()
}

/// Read the submitted fields, as JSON when the request says so and as a
/// urlencoded form otherwise.
fn read_form(req: &mut Request) -> Result<PostForm, FormError> {
    let is_json = matches!(req.headers.get::<ContentType>(),
                           Some(&ContentType(Mime(TopLevel::Application, SubLevel::Json, _))));

    let mut body = Vec::new();
    req.body.read_to_end(&mut body)?;

    if is_json {
        PostForm::from_json_bytes(body)
    } else {
        Ok(PostForm::from_urlencoded(&body))
    }
}

fn form_view(code: status::Status, form: &PostForm, errors: &FieldErrors) -> Response {
    let errors = errors.iter()
        .map(|(field, messages)| (field.to_string(), messages.to_json()))
        .collect();

    let mut view = BTreeMap::new();
    view.insert("form".to_string(), form.to_json());
    view.insert("errors".to_string(), Json::Object(errors));
    Response::with((code, Json::Object(view).to_string()))
}

fn redirect_to_list() -> Response {
    Response::with((status::SeeOther, RedirectRaw("/".to_string())))
}

fn not_found() -> Response {
    Response::with((status::NotFound, error_body("Post not found")))
}
