use crate::infra::{load_filter_config, load_listings, InMemoryDealHistory, InMemoryListingStore};
use auction_screener::config::ScreeningSettings;
use auction_screener::error::AppError;
use auction_screener::workflows::screening::{
    CostPolicy, ProfitProjection, ProfitRequest, ScreeningReport, ScreeningService, TurnoverIndex,
};
use auction_screener::workflows::transactions::{DealHistoryImporter, ImportOptions};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// Listing export as JSON (a bare array or {"items": [...]})
    #[arg(long)]
    pub(crate) listings: PathBuf,
    /// Transaction history CSV used to compute turnover rates
    #[arg(long)]
    pub(crate) deals: Option<PathBuf>,
    /// Ignore transactions for units smaller than this area in square meters
    #[arg(long)]
    pub(crate) min_deal_area: Option<f64>,
    /// Filter configuration as JSON; omitted fields keep their defaults
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CalcArgs {
    /// Winning bid in won
    #[arg(long)]
    pub(crate) bid_price: i64,
    /// Expected resale price in won
    #[arg(long)]
    pub(crate) sale_price: i64,
    /// Share of the bid financed by a loan (defaults to 0.8)
    #[arg(long)]
    pub(crate) loan_rate: Option<f64>,
    /// Annual loan interest rate (defaults to 0.05)
    #[arg(long)]
    pub(crate) interest_rate: Option<f64>,
    /// Print the projection as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let settings = ScreeningSettings::load()?;
    let mut listings = load_listings(&args.listings)?;

    if let Some(path) = args.deals.as_deref() {
        let options = ImportOptions {
            min_area_m2: args.min_deal_area,
        };
        let index = TurnoverIndex::build(DealHistoryImporter::from_path(path, options)?);
        index.enrich(&mut listings);
    }

    let config = load_filter_config(args.config.as_deref())?;
    let service = ScreeningService::new(
        Arc::new(InMemoryListingStore::default()),
        Arc::new(InMemoryDealHistory::default()),
    )
    .with_keywords(settings.keywords);

    let report = service.screen_batch(listings, config);
    render_screening_report(&report, args.json)
}

pub(crate) fn run_calc(args: CalcArgs) -> Result<(), AppError> {
    let request = ProfitRequest {
        bid_price: args.bid_price,
        sale_price: args.sale_price,
        loan_rate: args.loan_rate,
        interest_rate: args.interest_rate,
    };
    let projection = CostPolicy::standard().project(&request);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
    } else {
        render_projection(&request, &projection);
    }
    Ok(())
}

pub(crate) fn render_screening_report(report: &ScreeningReport, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Screened {} listings", report.input_count);
    println!("\nStage funnel");
    for (index, count) in report.stages.iter().enumerate() {
        println!(
            "  {}. {}: {} remaining ({} excluded)",
            index + 1,
            count.label,
            count.remaining,
            count.excluded
        );
    }

    if report.results.is_empty() {
        println!("\nResults: none");
    } else {
        println!("\nResults");
        for result in &report.results {
            let listing = &result.listing;
            let turnover = listing
                .liquidity
                .turnover_rate
                .map(|rate| format!("{rate:.1}"))
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "  - {} | {} {} | {} | {:.1}py | min bid {} | discount {:.1}% | investment {} | turnover {}",
                listing.case_id,
                listing.location.region,
                listing.location.subregion,
                listing.property_name.as_deref().unwrap_or("-"),
                result.metrics.area_pyeong,
                format_won(listing.minimum_price),
                result.metrics.discount_rate,
                format_won(result.metrics.required_investment),
                turnover
            );
        }
    }

    let summary = &report.summary;
    println!("\nSummary");
    println!(
        "  {} results | avg discount {:.1}% | avg investment {} | avg turnover {:.1}",
        summary.count,
        summary.avg_discount_rate,
        format_won(summary.avg_investment),
        summary.avg_turnover_rate
    );
    if !summary.region_breakdown.is_empty() {
        let regions: Vec<String> = summary
            .region_breakdown
            .iter()
            .map(|(region, count)| format!("{region} {count}"))
            .collect();
        println!("  Regions: {}", regions.join(", "));
    }
    Ok(())
}

pub(crate) fn render_projection(request: &ProfitRequest, projection: &ProfitProjection) {
    println!(
        "Bid {} -> sale {}",
        format_won(request.bid_price),
        format_won(request.sale_price)
    );
    println!(
        "  Deposit {} | balance {} | acquisition tax {} | misc {}",
        format_won(projection.deposit),
        format_won(projection.balance),
        format_won(projection.acquisition_tax),
        format_won(projection.misc_cost)
    );
    println!("  Total investment {}", format_won(projection.total_investment));
    println!(
        "  Loan {} | monthly interest {}",
        format_won(projection.loan_amount),
        format_won(projection.monthly_interest)
    );
    println!(
        "  VAT {} | brokerage {}",
        format_won(projection.vat),
        format_won(projection.brokerage_fee)
    );
    println!(
        "  Net profit {} | ROI {:.1}%",
        format_won(projection.net_profit),
        projection.roi
    );
}

/// Thousands-separated won amount, e.g. `37,080,000원`.
pub(crate) fn format_won(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped}원")
}
