use std::io;
use std::sync::Arc;

use actix_web::{middleware, post, web, App, HttpResponse, HttpServer};
use failsafe::Config as CircuitBreakerConfig;
use r2d2_redis::r2d2;
use r2d2_redis::RedisConnectionManager;

mod config;
mod error;
mod history;
mod inventory;
mod models;
mod store;
mod updater;

use crate::config::Config;
use crate::error::UpdateError;
use crate::models::{CookedRecipeRequest, InvocationResponse, LastRecipesRequest};
use crate::store::{ItemStore, RedisStore};

type SharedStore = Arc<dyn ItemStore>;

// failures are reported in the body, the status is always 200
fn respond(result: Result<(), UpdateError>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(InvocationResponse::success()),
        Err(err) => {
            log::warn!("request failed: {err}");
            HttpResponse::Ok().json(models::error_message(&err))
        }
    }
}

async fn run_blocking<F>(f: F) -> Result<(), UpdateError>
where
    F: FnOnce() -> Result<(), UpdateError> + Send + 'static,
{
    web::block(f).await.map_err(|_| UpdateError::Cancelled)?
}

#[post("/apis/recipes/cooked")]
async fn cooked_recipe(store: web::Data<SharedStore>, payload: web::Bytes) -> HttpResponse {
    let request: CookedRecipeRequest = match models::parse_payload(&payload) {
        Ok(request) => request,
        Err(err) => return respond(Err(err.into())),
    };
    log::debug!("cooked recipe request: {:?}", request);

    let store = store.get_ref().clone();
    respond(run_blocking(move || updater::record_cooked_recipe(store.as_ref(), &request)).await)
}

#[post("/apis/recipes/last")]
async fn last_recipes(store: web::Data<SharedStore>, payload: web::Bytes) -> HttpResponse {
    let request: LastRecipesRequest = match models::parse_payload(&payload) {
        Ok(request) => request,
        Err(err) => return respond(Err(err.into())),
    };
    log::debug!("last recipes request: {:?}", request);

    let store = store.get_ref().clone();
    respond(run_blocking(move || updater::record_last_recipes(store.as_ref(), &request)).await)
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(cooked_recipe).service(last_recipes);
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // set up the store connection pool, shared by every request
    let manager = RedisConnectionManager::new(config.redis_url.as_str())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let redis_pool = r2d2::Pool::builder()
        .max_size(config.pool_max_open)
        .max_lifetime(Some(config.pool_expire))
        .min_idle(Some(config.pool_min_idle))
        .build(manager)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let circuit_breaker = CircuitBreakerConfig::new().build();
    let store: SharedStore = Arc::new(RedisStore::new(
        redis_pool,
        circuit_breaker,
        config.key_prefix.clone(),
    ));

    log::info!(
        "starting HTTP server at http://{}:{}",
        config.bind_address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
