//! 型材下料示例
//!
//! 執行：`RUST_LOG=debug cargo run --release --example profile_cut`

use std::sync::Arc;

use cutstock::{Bar, BarInfo, CutConfig, CutOptimizer, CutPiece, Demand, StockBars};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn d(value: &str) -> anyhow::Result<Decimal> {
    Ok(value.parse()?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== 型材下料示例 ===\n");

    // 型材斷面資訊
    let bar_info = BarInfo::new()
        .with_height(d("220")?)?
        .with_weight(d("60")?)?;

    // 庫存用完後使用的標準棒材
    let standard = Bar::new(d("6.5")?)?.with_initial_fall(d("0.025")?)?;

    let config = CutConfig::new()
        .with_blade_thickness(d("0.005")?)?
        .with_standard_bar(standard);

    // 庫存棒材
    let mut stock = StockBars::new();
    for length in ["3.175", "1.395", "0.775", "1.805", "1.905", "4.425"] {
        stock.insert(Bar::new(d(length)?)?.with_initial_fall(d("0.025")?)?);
    }
    for length in ["3.5", "4", "4", "4.5", "4.6", "6"] {
        stock.insert(Bar::new(d(length)?)?);
    }

    // 切割需求
    let mut demand = Demand::new(Arc::new(bar_info));
    for (length, count) in [("1.265", 29), ("1.260", 28), ("0.903", 29)] {
        for _ in 0..count {
            demand.insert(CutPiece::new(d(length)?)?);
        }
    }
    for length in ["1.335", "1.330", "0.973", "1.735", "1.735", "1.795", "2.070", "2.070"] {
        demand.insert(CutPiece::new(d(length)?)?);
    }

    println!("需求 {} 件，庫存 {} 支\n", demand.len(), stock.len());

    let optimizer = CutOptimizer::new(config, stock, demand)?;
    let result = optimizer.run()?;
    let cuts = &result.cut_bars;

    println!("排樣:");
    for group in cuts.group_by_layout() {
        let lengths: Vec<String> = group.piece_lengths.iter().map(|l| l.to_string()).collect();
        println!(
            "  {} x 棒材({}) : ({}) 餘料({})[{}%]",
            group.count,
            group.bar_length,
            lengths.join(", "),
            group.fall,
            group.fall_percent
        );
    }

    println!("\n切割件總長: {}", cuts.total_piece_length());
    println!("切割件數量: {}", cuts.total_piece_count());
    println!("使用棒材總長: {}", cuts.total_bar_length());
    println!("使用棒材數量: {}", cuts.total_bar_count());
    println!("使用但未對應庫存: {}", cuts.bars_not_stocked());
    println!(
        "總損耗: {}（{}%）",
        cuts.total_fall_length(),
        cuts.total_fall_percent()
    );
    println!(
        "不可回收損耗: {}（{}%）",
        cuts.total_non_recovered_length(),
        cuts.non_recovered_percent()
    );
    println!(
        "可回收餘料: {}（{} 支）",
        cuts.total_recovered_fall_length(),
        cuts.recovered_fall_bar_count()
    );
    println!(
        "\n輪數: {}，耗時 {} ms",
        result.rounds,
        result.calculation_time_ms.unwrap_or_default()
    );

    Ok(())
}
