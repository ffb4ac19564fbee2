use std::sync::Arc;

use clap::Args;

use order_bumps::checkout::bumps::{
    AdmissionDecision, ConditionLogic, Money, OfferOutcome, OrderBumpService, ProductId,
    UserLoggedInCondition,
};
use order_bumps::config::OfferSettings;
use order_bumps::error::AppError;

use crate::infra::{InMemoryCartGateway, InMemoryProductCatalog};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Cart total in cents for the simulated checkout context
    #[arg(long, default_value_t = 60_000)]
    pub(crate) cart_total: i64,
    /// Item count for the simulated checkout context
    #[arg(long, default_value_t = 3)]
    pub(crate) item_count: u32,
    /// Treat the visitor as authenticated
    #[arg(long)]
    pub(crate) logged_in: bool,
    /// Override the configured logic mode (AND or OR; anything else is rejected)
    #[arg(long, value_parser = parse_logic)]
    pub(crate) logic: Option<ConditionLogic>,
    /// Contribute a logged-in condition through the extension hook
    #[arg(long)]
    pub(crate) require_login: bool,
    /// Product ids to exclude, e.g. because they were already added
    #[arg(long, value_delimiter = ',')]
    pub(crate) exclude: Vec<u64>,
    /// Add the first listed offer to the cart at the end of the walk-through
    #[arg(long)]
    pub(crate) add_first: bool,
}

fn parse_logic(raw: &str) -> Result<ConditionLogic, String> {
    raw.parse::<ConditionLogic>().map_err(|err| err.to_string())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let settings = OfferSettings::default();
    let catalog = Arc::new(InMemoryProductCatalog::with_demo_products());
    let cart = Arc::new(InMemoryCartGateway::default());
    let mut service = OrderBumpService::new(catalog, cart.clone(), settings);

    if args.require_login {
        service.add_condition_hook(|composite| {
            composite.add_condition(Arc::new(UserLoggedInCondition));
        });
    }
    if let Some(logic) = args.logic {
        service.set_logic_resolver(move |_| logic);
    }

    let context = order_bumps::checkout::bumps::CheckoutContext {
        cart_total: Money::from_cents(args.cart_total),
        item_count: args.item_count,
        is_logged_in: args.logged_in,
    };
    let excluded: Vec<ProductId> = args.exclude.iter().copied().map(ProductId).collect();

    println!("Order bump walk-through");
    println!(
        "  thresholds: cart total {}, item count {}, logic {}",
        service.settings().cart_total_threshold,
        service.settings().item_count_threshold,
        service.settings().condition_logic
    );
    println!(
        "  context: total {}, {} item(s), logged in: {}",
        context.cart_total,
        context.item_count,
        if context.is_logged_in { "yes" } else { "no" }
    );

    match service.evaluate_admission(&context) {
        AdmissionDecision::Admitted => println!("  admission: admitted"),
        AdmissionDecision::Denied(reason) => {
            println!("  admission: denied ({})", reason.summary());
            return Ok(());
        }
    }

    let outcome = service.offers(&context, &excluded)?;
    let offers = match outcome {
        OfferOutcome::Available(offers) => offers,
        OfferOutcome::Withheld(reason) => {
            println!("  offers withheld: {}", reason.summary());
            return Ok(());
        }
    };

    println!("  offers:");
    for offer in &offers {
        println!("    [{}] {} ({})", offer.id, offer.name, offer.display_price);
    }

    if args.add_first {
        let first = &offers[0];
        service.add_to_cart(first.id, 1)?;
        println!("  added [{}] {} to the cart", first.id, first.name);
        let additions = cart.additions();
        println!("  cart now holds {} addition(s)", additions.len());
    }

    Ok(())
}
