use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use futures_util::future::join;

use crate::components::favorites::{self, FavoritesAction, FavoritesViewModel};
use crate::components::header::{self, HeaderViewModel};
use crate::components::login::{self, LoginAction, LoginState, LoginViewModel};
use crate::components::main_page::{self, MainAction, MainState, MainViewModel, SortType};
use crate::components::property::{self, PropertyAction, PropertyState, PropertyViewModel};
use crate::components::Effect;
use crate::config::Config;
use crate::environment::{Environment, Model, Repository};
use crate::route::Route;
use crate::store::{operations, selectors, Action, AuthorizationStatus};

/// Following more redirects than this means two pages send each other back and forth
const MAX_REDIRECTS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "six-cities")]
#[command(version)]
#[command(about = "Browse vacation rentals in six cities")]
struct Cli {
    /// The page to show: /, /login, /favorites or /offer/{id}
    #[arg(default_value = "/")]
    route: String,

    /// Select a city on the main page
    #[arg(long)]
    city: Option<String>,

    /// popular, price-asc, price-desc or top-rated
    #[arg(long, default_value = "popular", value_parser = parse_sort)]
    sort: SortType,

    #[arg(long, env = "SIX_CITIES_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "SIX_CITIES_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Toggle the bookmark of the offer shown
    #[arg(long)]
    favorite: bool,

    /// Post a review on the offer shown
    #[arg(long, requires = "rating")]
    review: Option<String>,

    /// Rating for --review, 1 to 5
    #[arg(long)]
    rating: Option<u8>,

    /// Sign out before showing the page
    #[arg(long)]
    logout: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn parse_sort(value: &str) -> Result<SortType, String> {
    value
        .parse()
        .map_err(|_| format!("unknown sort order {value:?}"))
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };
    log::debug!("{config:?}");

    let repository = Repository::new(config.data_directory.clone());
    let model = match Model::new(&config, repository.token()) {
        Ok(model) => model,
        Err(e) => {
            log::error!("Could not create client: {e}");
            return ExitCode::from(2);
        }
    };
    let environment = Environment::new(Arc::new(model), repository);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Could not start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = runtime.block_on(App::new(environment, cli).run());
    println!("{output}");
    ExitCode::SUCCESS
}

fn setup_logging(verbose: bool) {
    use env_logger::Env;
    use std::io::Write;
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}

struct App {
    environment: Environment,
    cli: Cli,
}

impl App {
    fn new(environment: Environment, cli: Cli) -> Self {
        Self { environment, cli }
    }

    async fn run(self) -> String {
        let store = &self.environment.store;
        store.subscribe("app", |state| {
            log::debug!(
                "offers: {}, city: {:?}, auth: {}, loading: {}",
                state.offers.len(),
                state.city,
                state.authorization_status,
                state.loading.is_any_loading()
            );
        });

        self.startup().await;

        if self.cli.logout {
            header::sign_out(&self.environment).await;
        }
        if let (Some(email), Some(password)) = (&self.cli.email, &self.cli.password) {
            if let Err(message) = self.login(email, password).await {
                return message;
            }
        }

        let mut route = Route::parse(&self.cli.route);
        for _ in 0..=MAX_REDIRECTS {
            if route.is_private() && !store.select(selectors::is_authorized) {
                route = Route::Login;
            }
            log::info!("Showing {route}");
            let (effect, page) = self.show(route).await;
            match effect {
                Effect::Navigate(next) if next != route => route = next,
                _ => return self.page(page),
            }
        }
        log::error!("Too many redirects, last route {route}");
        self.page("Too many redirects".to_string())
    }

    /// Ask the server whether the stored token is still valid while the
    /// offers load.
    async fn startup(&self) {
        let store = &self.environment.store;
        let api = self.environment.api();
        if self.environment.repository.token().is_none() {
            store.dispatch(Action::RequireAuthorization(AuthorizationStatus::NoAuth));
            if let Err(e) = operations::fetch_offers(store, api).await {
                log::warn!("Offers unavailable: {e}");
            }
            return;
        }
        let (auth, offers) = join(
            operations::check_auth(store, api),
            operations::fetch_offers(store, api),
        )
        .await;
        match auth {
            Ok(_) => {
                if let Err(e) = operations::fetch_favorite_offers(store, api).await {
                    log::warn!("Favorites unavailable: {e}");
                }
            }
            Err(e) if e.is_unauthorized() => {
                log::info!("Stored session expired");
                api.set_token(None);
                if let Err(e) = self.environment.repository.clear_session() {
                    log::error!("Could not clear session: {e}");
                }
            }
            Err(e) => log::warn!("Could not check session: {e}"),
        }
        if let Err(e) = offers {
            log::warn!("Offers unavailable: {e}");
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), String> {
        let mut state = LoginState::default();
        let actions = [
            LoginAction::UpdateEmail(email.to_string()),
            LoginAction::UpdatePassword(password.to_string()),
            LoginAction::Submit,
        ];
        for action in actions {
            login::reduce(action, &mut state, &self.environment).await;
        }
        let Some(ref error) = state.error_message else {
            return Ok(());
        };
        log::error!("Login failed: {error}");
        Err(self.page(LoginViewModel::new(&state, &self.environment.store).render()))
    }

    async fn show(&self, route: Route) -> (Effect, String) {
        let environment = &self.environment;
        let store = &environment.store;
        match route {
            Route::Main => {
                let mut state = MainState {
                    sort: self.cli.sort,
                    ..Default::default()
                };
                let mut effect = main_page::reduce(MainAction::Load, &mut state, environment).await;
                if let Some(ref city) = self.cli.city {
                    effect = main_page::reduce(MainAction::SelectCity(city.clone()), &mut state, environment)
                        .await;
                }
                (effect, MainViewModel::new(&state, store).render())
            }
            Route::Offer(id) => {
                let mut state = PropertyState::default();
                let mut effect = property::reduce(PropertyAction::Open(id), &mut state, environment).await;
                if effect == Effect::Nothing && self.cli.favorite {
                    effect = property::reduce(PropertyAction::ToggleFavorite, &mut state, environment).await;
                }
                if let (Effect::Nothing, Some(comment)) = (effect, &self.cli.review) {
                    let rating = self.cli.rating.unwrap_or_default();
                    property::reduce(PropertyAction::UpdateRating(rating), &mut state, environment).await;
                    property::reduce(PropertyAction::UpdateComment(comment.clone()), &mut state, environment)
                        .await;
                    effect = property::reduce(PropertyAction::SubmitReview, &mut state, environment).await;
                }
                (effect, PropertyViewModel::new(&state, store).render())
            }
            Route::Favorites => {
                let effect = favorites::reduce(FavoritesAction::Load, environment).await;
                (effect, FavoritesViewModel::new(store).render())
            }
            Route::Login => {
                let mut state = LoginState::default();
                let effect = login::reduce(LoginAction::Load, &mut state, environment).await;
                (effect, LoginViewModel::new(&state, store).render())
            }
            Route::NotFound => (
                Effect::Nothing,
                "404 Not Found\nGo to the main page: /".to_string(),
            ),
        }
    }

    fn page(&self, body: String) -> String {
        let header = HeaderViewModel::new(&self.environment.store).render();
        format!("{header}\n\n{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::testing;
    use crate::environment::model::mock::{make_offer, MockApi};
    use crate::environment::types::OfferId;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("six-cities").chain(args.iter().copied()))
    }

    fn offers() -> Vec<crate::environment::types::Offer> {
        vec![
            make_offer(1, "Paris", 300),
            make_offer(2, "Cologne", 90),
            make_offer(3, "Paris", 100),
        ]
    }

    #[test]
    fn test_cli() {
        let parsed = cli(&["/offer/3", "--sort", "price-desc", "--favorite"]);
        assert_eq!(Route::parse(&parsed.route), Route::Offer(OfferId(3)));
        assert_eq!(parsed.sort, SortType::PriceHighToLow);
        assert!(parsed.favorite);
        assert!(Cli::try_parse_from(["six-cities", "--sort", "cheapest"]).is_err());
        assert!(Cli::try_parse_from(["six-cities", "--review", "nice"]).is_err());
    }

    #[tokio::test]
    async fn test_main_page() {
        let (environment, _api) = testing::environment(MockApi::new(offers()));
        let output = App::new(environment, cli(&["--city", "Paris", "--sort", "price-asc"]))
            .run()
            .await;
        assert!(output.starts_with("six cities | Sign in\n\n"));
        assert!(output.contains("2 places to stay in Paris"));
        let cheap = output.find("#3 Offer 3").unwrap();
        let expensive = output.find("#1 Offer 1").unwrap();
        assert!(cheap < expensive);
    }

    #[tokio::test]
    async fn test_favorites_redirects_to_login() {
        let (environment, _api) = testing::environment(MockApi::new(offers()));
        let output = App::new(environment, cli(&["/favorites"])).run().await;
        assert!(output.contains("Sign in\n"));
    }

    #[tokio::test]
    async fn test_unknown_offer_is_not_found() {
        let (environment, _api) = testing::environment(MockApi::new(offers()));
        let output = App::new(environment, cli(&["/offer/42"])).run().await;
        assert!(output.contains("404 Not Found"));
        let (environment, _api) = testing::environment(MockApi::new(offers()));
        let output = App::new(environment, cli(&["/offer/abc"])).run().await;
        assert!(output.contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_login_then_favorite() {
        let (environment, api) = testing::environment(MockApi::new(offers()));
        let args = [
            "/offer/1",
            "--email",
            "someone@example.com",
            "--password",
            "secret1",
            "--favorite",
        ];
        let output = App::new(environment, cli(&args)).run().await;
        assert!(output.starts_with("six cities | someone@example.com (1) | Sign out"));
        assert!(output.contains("Offer 1 [In bookmarks]"));
        assert!(api.calls().contains(&"set_favorite_status".to_string()));
    }
}
