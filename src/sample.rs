//! Synthetic pilot-period uploads for demos and benchmarks.
//!
//! The output uses the legacy `feedback` header and carries an
//! extra `latency` column, so a generated file exercises header aliasing and
//! passthrough columns as well as the aggregates.

use chrono::NaiveDate;

pub const HEADER: &str = "id,user,chat,query,model,stage,latency,status,feedback,date,time,retryCount";

const USERS: &[&str] = &[
    "user_01", "user_02", "user_03", "user_04", "user_05", "user_08", "user_10", "user_12", "manager",
    "admin",
];
const MODELS: &[&str] = &["GPT-4", "Claude 3.5", "Llama 3"];
// success-weighted
const STATUSES: &[&str] = &["SUCCESS", "SUCCESS", "SUCCESS", "SUCCESS", "FAIL", "ERROR", "BLOCKED"];
const STAGES: [&str; 5] = ["1. 모델 상태 확인", "2. 질문 분석", "3. 메타 조회", "4. SQL 생성", "5. 결과 요약"];
const QUESTIONS: &[&str] = &[
    "일별 매출 현황 보여줘",
    "이번 달 가장 많이 팔린 상품 10개",
    "강남구 지역 배달 지연 건수",
    "VIP 고객 리스트 추출해줘",
    "서버 로그 중 에러 발생 비율",
    "최근 3개월간 월별 사용자 증가 추이",
    "결제 수단별 매출 비중, 파이 차트로",
    "최근 3개월 동안 'Timeout' 관련 오류가 발생한 시간대별 빈도수를 분석해줘",
    "\"Winter Sale\" 캠페인으로 유입된 신규 고객의 첫 구매 평균 금액",
    "분기별 매출, 영업이익, 순이익 데이터를 월 단위로 정리해줘",
];

/// Shape of a generated upload.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Average records per day; each day varies by -2..=+3 around it.
    pub per_day: usize,
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 12, 17).expect("valid calendar date"),
            end: NaiveDate::from_ymd_opt(2025, 12, 24).expect("valid calendar date"),
            per_day: 15,
            seed: 42,
        }
    }
}

/// Generate a CSV document. The same `SampleSpec` always yields the same text.
pub fn generate(spec: &SampleSpec) -> String {
    let mut rng = fastrand::Rng::with_seed(spec.seed);
    let mut lines = vec![HEADER.to_string()];
    let mut counter = 1usize;

    for day in spec.start.iter_days().take_while(|d| *d <= spec.end) {
        let jitter = rng.i64(-2..=3);
        let count = (spec.per_day as i64 + jitter).max(0) as usize;
        for _ in 0..count {
            lines.push(sample_row(&mut rng, counter, day));
            counter += 1;
        }
    }

    tracing::debug!(records = counter - 1, seed = spec.seed, "generated sample upload");
    lines.join("\n")
}

fn sample_row(rng: &mut fastrand::Rng, n: usize, day: NaiveDate) -> String {
    let status = pick(rng, STATUSES);
    let stage = match status {
        "SUCCESS" => STAGES[4],
        "BLOCKED" => STAGES[0],
        "ERROR" => pick(rng, &STAGES[2..4]),
        _ => pick(rng, &STAGES[1..3]),
    };
    let feedback = match status {
        "SUCCESS" if rng.f64() > 0.3 => rng.u8(3..=5).to_string(),
        "SUCCESS" => String::new(),
        _ if rng.f64() > 0.5 => rng.u8(1..=2).to_string(),
        _ => String::new(),
    };
    let retries = if status == "SUCCESS" || status == "BLOCKED" { 0 } else { rng.u32(0..=3) };

    let user = pick(rng, USERS);
    let chat = rng.u32(100..=999);
    let query = pick(rng, QUESTIONS);
    let model = pick(rng, MODELS);
    let latency = 0.3 + rng.f64() * 2.5;
    let time = format!("{:02}:{:02}:{:02}", rng.u32(9..=19), rng.u32(0..=59), rng.u32(0..=59));

    format!(
        "Q-PILOT-{n:03},{user},C-{chat},{},{model},{stage},{latency:.1}s,{status},{feedback},{},{time},{retries}",
        quote(query),
        day.format("%Y-%m-%d"),
    )
}

fn pick(rng: &mut fastrand::Rng, xs: &[&'static str]) -> &'static str {
    xs[rng.usize(..xs.len())]
}

/// Always-quoted CSV cell with embedded quotes doubled.
fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
