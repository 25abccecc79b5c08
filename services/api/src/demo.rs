use crate::infra::{InMemoryDealHistory, InMemoryListingStore};
use crate::report::{render_projection, render_screening_report};
use auction_screener::error::AppError;
use auction_screener::workflows::screening::{
    CostPolicy, FilterConfig, Liquidity, ListingQuery, ListingRecord, Location, ProfitRequest,
    PropertyKind, ScreeningReport, ScreeningService,
};
use chrono::NaiveDate;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the screening report as JSON instead of the text walkthrough
    #[arg(long)]
    pub(crate) json: bool,
}

struct SampleListing {
    case_id: &'static str,
    court: &'static str,
    address: &'static str,
    region: &'static str,
    subregion: &'static str,
    neighborhood: &'static str,
    property_name: &'static str,
    unit_label: &'static str,
    area_m2: f64,
    appraisal_price: i64,
    minimum_price: i64,
    fail_count: u32,
    auction_on: (u32, u32),
    liquidity: (f64, i64, u32),
}

const SAMPLE_LISTINGS: [SampleListing; 15] = [
    SampleListing {
        case_id: "2024타경62001",
        court: "인천지방법원",
        address: "인천 서구 청라동 123",
        region: "인천",
        subregion: "서구",
        neighborhood: "청라동",
        property_name: "청라 센트럴파크",
        unit_label: "101동 1203호",
        area_m2: 84.5,
        appraisal_price: 450_000_000,
        minimum_price: 225_000_000,
        fail_count: 2,
        auction_on: (2, 1),
        liquidity: (4.5, 430_000_000, 45),
    },
    SampleListing {
        case_id: "2024타경62002",
        court: "수원지방법원",
        address: "경기 화성시 동탄동 456",
        region: "경기",
        subregion: "화성시",
        neighborhood: "동탄동",
        property_name: "동탄 시범단지",
        unit_label: "203동 805호",
        area_m2: 102.3,
        appraisal_price: 520_000_000,
        minimum_price: 260_000_000,
        fail_count: 2,
        auction_on: (2, 3),
        liquidity: (3.8, 510_000_000, 38),
    },
    SampleListing {
        case_id: "2024타경62003",
        court: "의정부지방법원",
        address: "경기 남양주시 다산동 789",
        region: "경기",
        subregion: "남양주시",
        neighborhood: "다산동",
        property_name: "다산 자연앤자이",
        unit_label: "105동 1801호",
        area_m2: 84.9,
        appraisal_price: 480_000_000,
        minimum_price: 240_000_000,
        fail_count: 2,
        auction_on: (2, 5),
        liquidity: (4.2, 460_000_000, 42),
    },
    SampleListing {
        case_id: "2024타경62004",
        court: "대전지방법원",
        address: "대전 유성구 봉명동 234",
        region: "대전",
        subregion: "유성구",
        neighborhood: "봉명동",
        property_name: "봉명 e편한세상",
        unit_label: "102동 1502호",
        area_m2: 76.8,
        appraisal_price: 320_000_000,
        minimum_price: 160_000_000,
        fail_count: 2,
        auction_on: (2, 7),
        liquidity: (5.1, 310_000_000, 51),
    },
    SampleListing {
        case_id: "2024타경62005",
        court: "청주지방법원",
        address: "충북 청주시 흥덕구 복대동 111",
        region: "충북",
        subregion: "청주시",
        neighborhood: "복대동",
        property_name: "복대 푸르지오",
        unit_label: "108동 702호",
        area_m2: 84.2,
        appraisal_price: 290_000_000,
        minimum_price: 145_000_000,
        fail_count: 2,
        auction_on: (2, 10),
        liquidity: (4.8, 285_000_000, 48),
    },
    SampleListing {
        case_id: "2024타경62006",
        court: "광주지방법원",
        address: "광주 광산구 수완동 567",
        region: "광주",
        subregion: "광산구",
        neighborhood: "수완동",
        property_name: "수완 호반베르디움",
        unit_label: "105동 903호",
        area_m2: 84.9,
        appraisal_price: 280_000_000,
        minimum_price: 140_000_000,
        fail_count: 2,
        auction_on: (2, 12),
        liquidity: (5.5, 270_000_000, 55),
    },
    SampleListing {
        case_id: "2024타경62007",
        court: "전주지방법원",
        address: "전북 전주시 덕진구 송천동 222",
        region: "전북",
        subregion: "전주시",
        neighborhood: "송천동",
        property_name: "송천 아이파크",
        unit_label: "201동 1103호",
        area_m2: 99.5,
        appraisal_price: 350_000_000,
        minimum_price: 175_000_000,
        fail_count: 2,
        auction_on: (2, 14),
        liquidity: (4.3, 340_000_000, 43),
    },
    SampleListing {
        case_id: "2024타경62008",
        court: "부산지방법원",
        address: "부산 사하구 다대동 333",
        region: "부산",
        subregion: "사하구",
        neighborhood: "다대동",
        property_name: "다대 포레나",
        unit_label: "103동 1205호",
        area_m2: 74.8,
        appraisal_price: 250_000_000,
        minimum_price: 125_000_000,
        fail_count: 2,
        auction_on: (2, 16),
        liquidity: (6.2, 240_000_000, 62),
    },
    SampleListing {
        case_id: "2024타경62009",
        court: "울산지방법원",
        address: "울산 남구 삼산동 444",
        region: "울산",
        subregion: "남구",
        neighborhood: "삼산동",
        property_name: "삼산 롯데캐슬",
        unit_label: "107동 1601호",
        area_m2: 114.5,
        appraisal_price: 420_000_000,
        minimum_price: 210_000_000,
        fail_count: 2,
        auction_on: (2, 18),
        liquidity: (3.9, 410_000_000, 39),
    },
    SampleListing {
        case_id: "2024타경62010",
        court: "창원지방법원 마산지원",
        address: "경남 창원시 마산회원구 합성동 555",
        region: "경남",
        subregion: "창원시",
        neighborhood: "합성동",
        property_name: "마산 센트럴자이",
        unit_label: "102동 908호",
        area_m2: 84.7,
        appraisal_price: 310_000_000,
        minimum_price: 155_000_000,
        fail_count: 2,
        auction_on: (2, 20),
        liquidity: (4.7, 300_000_000, 47),
    },
    SampleListing {
        case_id: "2024타경62011",
        court: "원주지방법원",
        address: "강원 원주시 단구동 666",
        region: "강원",
        subregion: "원주시",
        neighborhood: "단구동",
        property_name: "원주 더샵",
        unit_label: "104동 1004호",
        area_m2: 84.3,
        appraisal_price: 260_000_000,
        minimum_price: 130_000_000,
        fail_count: 2,
        auction_on: (2, 22),
        liquidity: (5.8, 250_000_000, 58),
    },
    SampleListing {
        case_id: "2024타경62012",
        court: "제주지방법원",
        address: "제주 제주시 노형동 777",
        region: "제주",
        subregion: "제주시",
        neighborhood: "노형동",
        property_name: "노형 래미안",
        unit_label: "101동 1502호",
        area_m2: 99.8,
        appraisal_price: 380_000_000,
        minimum_price: 190_000_000,
        fail_count: 2,
        auction_on: (2, 24),
        liquidity: (3.6, 370_000_000, 36),
    },
    SampleListing {
        case_id: "2024타경62013",
        court: "대구지방법원 서부지원",
        address: "대구 달서구 상인동 888",
        region: "대구",
        subregion: "달서구",
        neighborhood: "상인동",
        property_name: "상인 힐스테이트",
        unit_label: "106동 503호",
        area_m2: 59.8,
        appraisal_price: 220_000_000,
        minimum_price: 176_000_000,
        fail_count: 1,
        auction_on: (2, 26),
        liquidity: (5.3, 215_000_000, 53),
    },
    SampleListing {
        case_id: "2024타경62014",
        court: "수원지방법원 안산지원",
        address: "경기 안산시 상록구 본오동 999",
        region: "경기",
        subregion: "안산시",
        neighborhood: "본오동",
        property_name: "안산 그랑시티",
        unit_label: "203동 1201호",
        area_m2: 84.5,
        appraisal_price: 350_000_000,
        minimum_price: 280_000_000,
        fail_count: 1,
        auction_on: (2, 28),
        liquidity: (4.1, 345_000_000, 41),
    },
    SampleListing {
        case_id: "2024타경62015",
        court: "인천지방법원 부천지원",
        address: "경기 부천시 중동 1010",
        region: "경기",
        subregion: "부천시",
        neighborhood: "중동",
        property_name: "중동 신도브래뉴",
        unit_label: "101동 1702호",
        area_m2: 76.2,
        appraisal_price: 380_000_000,
        minimum_price: 304_000_000,
        fail_count: 1,
        auction_on: (3, 2),
        liquidity: (4.4, 375_000_000, 44),
    },
];

impl SampleListing {
    fn to_record(&self) -> ListingRecord {
        let location = Location {
            region: self.region.to_string(),
            subregion: self.subregion.to_string(),
            neighborhood: Some(self.neighborhood.to_string()),
        };
        let mut record = ListingRecord::new(self.case_id, PropertyKind::Apt, location);
        let (month, day) = self.auction_on;
        let (turnover_rate, avg_deal_price, deal_count) = self.liquidity;

        record.court = Some(self.court.to_string());
        record.address = Some(self.address.to_string());
        record.property_name = Some(self.property_name.to_string());
        record.unit_label = Some(self.unit_label.to_string());
        record.area_m2 = self.area_m2;
        record.appraisal_price = self.appraisal_price;
        record.minimum_price = self.minimum_price;
        record.fail_count = self.fail_count;
        record.auction_date = NaiveDate::from_ymd_opt(2025, month, day);
        record.liquidity = Liquidity {
            turnover_rate: Some(turnover_rate),
            avg_deal_price: Some(avg_deal_price),
            deal_count: Some(deal_count),
        };
        record
    }
}

pub(crate) fn sample_listings() -> Vec<ListingRecord> {
    SAMPLE_LISTINGS.iter().map(SampleListing::to_record).collect()
}

pub(crate) fn screen_samples() -> Result<ScreeningReport, AppError> {
    let service = ScreeningService::new(
        Arc::new(InMemoryListingStore::default()),
        Arc::new(InMemoryDealHistory::default()),
    );
    service.ingest_listings(sample_listings())?;
    Ok(service.screen(&ListingQuery::default(), FilterConfig::default())?)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let report = screen_samples()?;
    if args.json {
        return render_screening_report(&report, true);
    }

    println!("Foreclosure auction screening demo");
    println!(
        "Default policy: apartments of 59m2 or more outside 서울/경기/인천, at most 3 failed rounds, \
turnover of 3.0 or more, required investment within 50,000,000원\n"
    );
    render_screening_report(&report, false)?;

    // Deepest discount, resold at the complex's average deal price.
    let top_pick = report.results.iter().max_by(|a, b| {
        a.metrics
            .discount_rate
            .total_cmp(&b.metrics.discount_rate)
            .then_with(|| b.listing.case_id.cmp(&a.listing.case_id))
    });
    if let Some(result) = top_pick {
        let sale_price = result
            .listing
            .liquidity
            .avg_deal_price
            .unwrap_or(result.listing.appraisal_price);
        println!("\nProfit projection for {}", result.listing.case_id);
        let request = ProfitRequest {
            bid_price: result.listing.minimum_price,
            sale_price,
            loan_rate: None,
            interest_rate: None,
        };
        render_projection(&request, &CostPolicy::standard().project(&request));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_listings_cover_every_case() {
        let listings = sample_listings();
        assert_eq!(listings.len(), 15);
        assert!(listings.iter().all(|listing| listing.auction_date.is_some()));
        assert_eq!(listings[0].unit_floor(), Some(12));
    }

    #[test]
    fn capital_area_samples_are_screened_out() {
        let report = screen_samples().expect("demo screening succeeds");

        assert_eq!(report.input_count, 15);
        let remaining: Vec<usize> = report.stages.iter().map(|count| count.remaining).collect();
        assert_eq!(remaining, vec![10; 6]);
        assert_eq!(report.summary.count, 10);
        assert!(!report.summary.region_breakdown.contains_key("경기"));
        assert!(!report.summary.region_breakdown.contains_key("인천"));
        assert_eq!(report.results[0].listing.case_id, "2024타경62004");
    }
}
