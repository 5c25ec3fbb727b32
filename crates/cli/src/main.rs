use anyhow::{Context, Result};
use catalog::{
    Aspect, AspectRatings, FileStorage, Offer, Photo, Review, ReviewDraft, ShopReview,
    ShopReviewDraft, MAX_RATING,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use pipeline::{
    OfferCriteria, OfferSort, Page, PageRequest, RatingStats, ReviewCriteria, ReviewSort,
    ShopCriteria, ShopRatingStats, ShopReviewCriteria, ShopSort, SortKey,
};
use serde::Serialize;
use service::{ReviewBoard, ShopSummary};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Review Desk - marketplace reviews from the command line
#[derive(Parser)]
#[command(name = "review-desk")]
#[command(about = "Browse, filter and submit marketplace reviews", long_about = None)]
struct Cli {
    /// Directory the review collections are stored in
    #[arg(
        short,
        long,
        global = true,
        env = "REVIEW_DESK_DATA_DIR",
        default_value = "data"
    )]
    data_dir: PathBuf,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show stats and reviews for an offer
    Reviews {
        /// Offer ID
        #[arg(long)]
        offer: String,

        #[command(flatten)]
        filters: ReviewFilterArgs,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show stats and reviews for a shop
    ShopReviews {
        /// Shop ID
        #[arg(long)]
        shop: String,

        #[command(flatten)]
        filters: ReviewFilterArgs,

        /// Only reviews tied to a fulfilled order
        #[arg(long)]
        order_verified: bool,

        /// Only reviews that do (true) or don't (false) recommend the shop
        #[arg(long)]
        recommended: Option<bool>,

        /// Only reviews that rated this aspect
        #[arg(long)]
        aspect: Option<Aspect>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Browse the offer catalogue
    Offers {
        #[arg(long)]
        category: Option<String>,

        /// Only offers sold by this shop
        #[arg(long)]
        shop: Option<String>,

        /// Lowest price, in cents
        #[arg(long)]
        min_price: Option<u64>,

        /// Highest price, in cents
        #[arg(long)]
        max_price: Option<u64>,

        #[arg(long)]
        min_rating: Option<f64>,

        #[arg(long)]
        in_stock: bool,

        /// Search titles and descriptions
        #[arg(long)]
        search: Option<String>,

        /// newest, priceLow, priceHigh, rating or popular
        #[arg(long)]
        sort: Option<String>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Browse the shop directory
    Shops {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        min_rating: Option<f64>,

        /// Only verified sellers
        #[arg(long)]
        verified: bool,

        /// Search names and descriptions
        #[arg(long)]
        search: Option<String>,

        /// rating, reviews, newest or name
        #[arg(long)]
        sort: Option<String>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Submit a review for an offer
    Submit {
        /// Offer ID
        #[arg(long)]
        offer: String,

        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Submit a review for a shop
    SubmitShop {
        /// Shop ID
        #[arg(long)]
        shop: String,

        #[command(flatten)]
        review: ReviewArgs,

        #[arg(long)]
        service: Option<u8>,

        #[arg(long)]
        quality: Option<u8>,

        #[arg(long)]
        shipping: Option<u8>,

        #[arg(long)]
        communication: Option<u8>,

        #[arg(long)]
        value: Option<u8>,

        /// Whether you would recommend the shop
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        recommend: bool,

        /// The review is tied to an order the shop fulfilled
        #[arg(long)]
        order_verified: bool,
    },

    /// Mark a review (item or shop) as helpful
    Helpful {
        /// Review ID
        review_id: String,
    },

    /// Throw away stored reviews and go back to the sample data
    Reset,
}

#[derive(Args)]
struct ReviewFilterArgs {
    /// Only reviews with exactly this many stars
    #[arg(long)]
    rating: Option<u8>,

    /// Only reviews with photos
    #[arg(long)]
    photos: bool,

    /// Only verified purchases
    #[arg(long)]
    verified: bool,

    /// newest, oldest, ratingHigh, ratingLow or mostHelpful
    #[arg(long)]
    sort: Option<String>,
}

impl ReviewFilterArgs {
    fn criteria(&self) -> ReviewCriteria {
        ReviewCriteria {
            rating_equals: self.rating,
            require_photos: self.photos,
            require_verified: self.verified,
            sort_key: self.sort.as_deref().map(ReviewSort::parse_lenient),
        }
    }
}

#[derive(Args)]
struct PageArgs {
    #[arg(long, default_value = "1")]
    page: usize,

    #[arg(long, default_value = "10")]
    per_page: usize,
}

impl PageArgs {
    fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

#[derive(Args)]
struct ReviewArgs {
    /// Stars, 1 to 5
    #[arg(long)]
    rating: u8,

    #[arg(long)]
    comment: String,

    #[arg(long)]
    title: Option<String>,

    #[arg(long, default_value = "Anonymous")]
    author: String,

    #[arg(long, default_value = "guest")]
    author_id: String,

    /// Photo URL, can be repeated
    #[arg(long = "photo")]
    photos: Vec<String>,

    /// The purchase was verified
    #[arg(long)]
    verified: bool,
}

impl ReviewArgs {
    fn into_draft(self, subject_id: String) -> ReviewDraft {
        let photos = self
            .photos
            .into_iter()
            .enumerate()
            .map(|(i, url)| photo_from_url(i, url))
            .collect();

        ReviewDraft {
            subject_id,
            author_id: self.author_id,
            author_name: self.author,
            rating: self.rating,
            title: self.title,
            comment: self.comment,
            photos,
            verified_purchase: self.verified,
        }
    }
}

fn photo_from_url(index: usize, url: String) -> Photo {
    let filename = url.rsplit('/').next().unwrap_or_default().to_string();
    Photo {
        id: format!("photo-{}", index + 1),
        url,
        filename,
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let storage = Arc::new(FileStorage::new(&cli.data_dir));
    let mut board = ReviewBoard::open(storage.clone())
        .with_context(|| format!("Failed to open reviews in {}", storage.dir().display()))?;
    tracing::debug!("Opened review board in {:?}", start.elapsed());

    let json = cli.json;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Reviews {
            offer,
            filters,
            paging,
        } => handle_reviews(&board, &offer, &filters, &paging, json)?,
        Commands::ShopReviews {
            shop,
            filters,
            order_verified,
            recommended,
            aspect,
            paging,
        } => {
            let criteria = ShopReviewCriteria {
                review: filters.criteria(),
                require_order_verified: order_verified,
                recommendation_equals: recommended,
                aspect_present: aspect,
            };
            handle_shop_reviews(&board, &shop, &criteria, &paging, json)?
        }
        Commands::Offers {
            category,
            shop,
            min_price,
            max_price,
            min_rating,
            in_stock,
            search,
            sort,
            paging,
        } => {
            let criteria = OfferCriteria {
                category,
                shop_id: shop,
                min_price,
                max_price,
                min_rating,
                in_stock_only: in_stock,
                search,
                sort_key: sort.as_deref().map(OfferSort::parse_lenient),
            };
            let page = board.offers(&criteria, paging.request());
            output(&page, json, print_offers)?
        }
        Commands::Shops {
            category,
            min_rating,
            verified,
            search,
            sort,
            paging,
        } => {
            let criteria = ShopCriteria {
                category,
                min_rating,
                verified_only: verified,
                search,
                sort_key: sort.as_deref().map(ShopSort::parse_lenient),
            };
            let page = board.shops(&criteria, paging.request());
            output(&page, json, print_shops)?
        }
        Commands::Submit { offer, review } => {
            let review = board.submit_review(review.into_draft(offer))?;
            output(&review, json, |review| {
                println!("{} Stored review {}", "✓".green(), review.id);
            })?
        }
        Commands::SubmitShop {
            shop,
            review,
            service,
            quality,
            shipping,
            communication,
            value,
            recommend,
            order_verified,
        } => {
            let mut aspects = AspectRatings::new();
            aspects.set(Aspect::Service, service);
            aspects.set(Aspect::Quality, quality);
            aspects.set(Aspect::Shipping, shipping);
            aspects.set(Aspect::Communication, communication);
            aspects.set(Aspect::Value, value);

            let draft = ShopReviewDraft {
                review: review.into_draft(shop),
                aspects,
                recommendation: recommend,
                order_verified,
            };
            let review = board.submit_shop_review(draft)?;
            output(&review, json, |review| {
                println!("{} Stored shop review {}", "✓".green(), review.review.id);
            })?
        }
        Commands::Helpful { review_id } => {
            let found = board.mark_helpful(&review_id)?;
            if json {
                println!("{}", serde_json::json!({ "reviewId": review_id, "found": found }));
            } else if found {
                println!("{} Marked {} as helpful", "✓".green(), review_id);
            } else {
                println!("{} No review with id {}", "✗".yellow(), review_id);
            }
        }
        Commands::Reset => {
            board.reset()?;
            if json {
                println!("{}", serde_json::json!({ "reset": true }));
            } else {
                println!("{} Reviews reset to the sample data", "✓".green());
            }
        }
    }

    Ok(())
}

/// Print `value` as JSON, or hand it to the text printer
fn output<T: Serialize>(value: &T, json: bool, print: impl FnOnce(&T)) -> Result<()> {
    if json {
        let raw = serde_json::to_string_pretty(value).context("Failed to encode output")?;
        println!("{}", raw);
    } else {
        print(value);
    }
    Ok(())
}

/// Handle the 'reviews' command
fn handle_reviews(
    board: &ReviewBoard<FileStorage>,
    offer_id: &str,
    filters: &ReviewFilterArgs,
    paging: &PageArgs,
    json: bool,
) -> Result<()> {
    let listing = board.item_reviews(offer_id, &filters.criteria(), paging.request())?;

    output(&listing, json, |listing| {
        if let Some(offer) = board.offer(offer_id) {
            println!("{}", offer.title.bold().blue());
        }
        print_stats(&listing.stats);
        print_page_header(&listing.page);
        for review in &listing.page.items {
            print_review(review);
        }
    })
}

/// Handle the 'shop-reviews' command
fn handle_shop_reviews(
    board: &ReviewBoard<FileStorage>,
    shop_id: &str,
    criteria: &ShopReviewCriteria,
    paging: &PageArgs,
    json: bool,
) -> Result<()> {
    let listing = board.shop_reviews(shop_id, criteria, paging.request())?;

    output(&listing, json, |listing| {
        if let Some(shop) = board.shop(shop_id) {
            println!("{}", shop.name.bold().blue());
        }
        print_shop_stats(&listing.stats);
        print_page_header(&listing.page);
        for review in &listing.page.items {
            print_shop_review(review);
        }
    })
}

fn stars(rating: f64) -> String {
    let filled = rating.round().clamp(0.0, f64::from(MAX_RATING)) as usize;
    let empty = usize::from(MAX_RATING) - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

fn price(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn print_stats(stats: &RatingStats) {
    println!(
        "{} {:.1} ({} reviews)",
        stars(stats.average_rating).yellow(),
        stats.average_rating,
        stats.total_count
    );
    for rating in (1..=MAX_RATING).rev() {
        let count = stats.count_for(rating);
        let width = if stats.total_count > 0 {
            (count as usize * 20) / stats.total_count as usize
        } else {
            0
        };
        println!("  {} {} {}", rating, "█".repeat(width).green(), count);
    }
}

fn print_shop_stats(stats: &ShopRatingStats) {
    print_stats(&stats.overall);
    for aspect in Aspect::ALL {
        println!("  {:<14} {:.1}", aspect.to_string(), stats.aspect_average(aspect));
    }
    println!(
        "  {:.0}% would recommend",
        stats.recommendation_percentage
    );
}

fn print_page_header<T>(page: &Page<T>) {
    println!(
        "{}",
        format!(
            "Page {} of {} ({} matching)",
            page.page,
            page.total_pages.max(1),
            page.total_items
        )
        .bold()
    );
}

fn print_review(review: &Review) {
    let mut badges = Vec::new();
    if review.verified_purchase {
        badges.push("verified".green().to_string());
    }
    if !review.photos.is_empty() {
        badges.push(format!("{} photos", review.photos.len()).cyan().to_string());
    }

    println!(
        "{} {} by {} on {} {}",
        stars(f64::from(review.rating)).yellow(),
        review.title.as_deref().unwrap_or("").bold(),
        review.author_name,
        review.created_at.format("%Y-%m-%d"),
        badges.join(" ")
    );
    println!("    {}", review.comment);
    println!(
        "    {} helpful · {}",
        review.helpful_count,
        review.id.dimmed()
    );
}

fn print_shop_review(review: &ShopReview) {
    print_review(&review.review);

    let aspects = review
        .aspects
        .iter()
        .map(|(aspect, score)| format!("{aspect} {score}"))
        .collect::<Vec<_>>()
        .join(", ");
    let recommends = if review.recommendation {
        "recommends".green()
    } else {
        "does not recommend".red()
    };
    println!("    {} · {}", aspects, recommends);
}

fn print_offers(page: &Page<Offer>) {
    print_page_header(page);
    for (rank, offer) in page.items.iter().enumerate() {
        let stock = if offer.in_stock() {
            format!("{} in stock", offer.stock).green()
        } else {
            "sold out".red()
        };
        println!(
            "{}. {} [{}] {} {} ({} reviews) {}",
            ((page.page - 1).saturating_mul(page.per_page) + rank + 1).to_string().green(),
            offer.title,
            offer.category,
            price(offer.price),
            stars(offer.rating).yellow(),
            offer.review_count,
            stock
        );
        println!("    {} · shop {}", offer.id.dimmed(), offer.shop_id);
    }
}

fn print_shops(page: &Page<ShopSummary>) {
    print_page_header(page);
    for summary in &page.items {
        let shop = &summary.shop;
        let verified = if shop.verified {
            " ✓".green().to_string()
        } else {
            String::new()
        };
        println!(
            "{}{} [{}] {}",
            shop.name.bold(),
            verified,
            shop.category,
            shop.location
        );
        println!(
            "    {} {:.1} from {} reviews, {:.0}% recommend · {}",
            stars(summary.stats.overall.average_rating).yellow(),
            summary.stats.overall.average_rating,
            summary.stats.overall.total_count,
            summary.stats.recommendation_percentage,
            shop.id.dimmed()
        );
    }
}
