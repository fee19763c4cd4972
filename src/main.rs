use clap::Parser;
use rfp_match::{catalog, cli, config, error, export, normalizer, pipeline, review, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use rfp_match_common::comparison::{build_comparison_table, ComparisonTable};
use rfp_match_common::matching::{compute_spec_match, RankedSku};
use rfp_match_common::{Outcome, RequirementSet};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn print_ranked(ranked: &[RankedSku]) {
    println!(
        "  {:<14} {:>7} {:<14} {:<6} {:>14}",
        "SKU", "Match%", "Class", "Volt", "Price/km"
    );
    for entry in ranked {
        println!(
            "  {:<14} {:>7.0} {:<14} {:<6} {:>14.2}",
            entry.sku.sku_id,
            entry.match_pct,
            entry.tier.as_str(),
            if entry.voltage_mismatch { "NG" } else { "OK" },
            entry.sku.unit_price
        );
    }
}

fn print_comparison(table: &ComparisonTable) {
    if table.is_empty() {
        return;
    }
    print!("  {:<14} {:<16}", "Spec", "RFP Requirement");
    for id in &table.sku_ids {
        print!(" {:<14}", id);
    }
    println!();
    for row in &table.rows {
        print!("  {:<14} {:<16}", row.label, row.required.as_deref().unwrap_or("-"));
        for value in &row.values {
            print!(" {:<14}", value);
        }
        println!();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Scan { folder, days } => {
            println!("🔎 rfp-match - RFPスキャン\n");

            let folder = folder.unwrap_or_else(|| config.rfp_folder.clone());
            let days = days.unwrap_or(config.horizon_days);

            let rfps = scanner::scan_rfps(&folder)?;
            println!("✔ {}件のRFPを検出\n", rfps.len());

            let eligible = scanner::prioritize_rfps(&rfps, days, today);
            let eligible_paths: Vec<_> = eligible.iter().map(|r| r.path.clone()).collect();

            for rfp in &eligible {
                println!(
                    "  ★ {:<24} {:<6} 期限 {} (残り{}日)",
                    rfp.meta.rfp_id,
                    rfp.source.to_string(),
                    rfp.meta.due_date.map(|d| d.to_string()).unwrap_or_default(),
                    rfp.days_left(today).unwrap_or_default()
                );
            }
            for rfp in rfps.iter().filter(|r| !eligible_paths.contains(&r.path)) {
                println!(
                    "    {:<24} {:<6} 期限 {}",
                    rfp.meta.rfp_id,
                    rfp.source.to_string(),
                    rfp.meta.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
                );
            }

            println!("\n✅ {}日以内の対象: {}件", days, eligible.len());
        }

        Commands::Extract { document, output } => {
            println!("📄 rfp-match - 要求仕様抽出\n");

            let text = scanner::extract_full_text(&document)?;
            let requirements = normalizer::extract_requirements(&text, &config.section_keywords);

            let missing = requirements.missing_fields();
            if !missing.is_empty() {
                let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
                println!("⚠ 抽出できなかった項目: {}", labels.join(", "));
            }

            let json = serde_json::to_string_pretty(&requirements)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("✔ 結果を保存: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Match { requirements, catalog: catalog_path, top, output } => {
            println!("🔗 rfp-match - SKU照合\n");

            let content = std::fs::read_to_string(&requirements)?;
            let req: RequirementSet = serde_json::from_str(&content)?;

            println!("[1/2] SKUマスタを読み込み中...");
            let catalog_path = catalog_path.unwrap_or_else(|| config.catalog_path.clone());
            let skus = catalog::load_skus(&catalog_path)?;
            println!("✔ {}件のSKU\n", skus.len());

            println!("[2/2] 照合中...");
            let ranked = compute_spec_match(skus.records(), &req);
            let comparison = build_comparison_table(&ranked, &req, top.unwrap_or(config.top_n));
            println!("✔ 照合完了\n");

            print_ranked(&ranked);
            println!();
            print_comparison(&comparison);

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&serde_json::json!({
                    "requirements": req,
                    "ranked": ranked,
                    "comparison": comparison,
                }))?;
                std::fs::write(&path, json)?;
                println!("\n✔ 結果を保存: {}", path.display());
            }
        }

        Commands::Run {
            folder,
            catalog: catalog_path,
            test_prices,
            quantity,
            days,
            all_sources,
            output,
            format,
            interactive,
        } => {
            println!("🚀 rfp-match - 一括処理\n");

            let folder = folder.unwrap_or_else(|| config.rfp_folder.clone());
            let days = days.unwrap_or(config.horizon_days);
            let options = config.evaluation_options(quantity)?;

            // 1. Scan
            println!("[1/4] RFPをスキャン中...");
            let rfps = scanner::scan_rfps(&folder)?;
            let mut selected = pipeline::select_rfps(&rfps, days, today, all_sources);
            println!("✔ {}件中 {}件が対象\n", rfps.len(), selected.len());

            if interactive {
                selected = review::select_rfps_interactive(&selected, today)?;
            }
            if selected.is_empty() {
                return Err(error::RfpMatchError::NoRfpsFound(folder.display().to_string()));
            }

            // 2. Load master data
            println!("[2/4] SKUマスタ・試験価格表を読み込み中...");
            let skus = catalog::load_skus(&catalog_path.unwrap_or_else(|| config.catalog_path.clone()))?;
            let tests = catalog::load_test_prices(&test_prices.unwrap_or_else(|| config.test_prices_path.clone()))?;
            println!("✔ SKU {}件 / 試験 {}件 (試験費合計 {:.2})\n", skus.len(), tests.entries.len(), tests.total());

            // 3. Evaluate
            println!("[3/4] 照合・判定中...");
            let result = pipeline::run_pipeline(&selected, &skus, &tests, &options, &config.section_keywords);
            for evaluation in &result.evaluations {
                let best = evaluation
                    .best()
                    .map(|b| format!("{} ({:.0}%, {})", b.sku.sku_id, b.match_pct, b.tier))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {} → {} / {}", evaluation.rfp.rfp_id, evaluation.route(), best);
                if let Outcome::Priced { lines } = &evaluation.outcome {
                    if let Some(line) = lines.first() {
                        println!("    合計 {:.2} (材料 {:.2} + 試験 {:.2})", line.total_cost, line.material_cost, line.test_cost);
                    }
                }
            }
            for skipped in &result.skipped {
                println!("  ✗ {} をスキップ: {}", skipped.rfp_id, skipped.reason);
            }
            println!("✔ 判定完了\n");

            // 4. Export
            println!("[4/4] エクスポート中...");
            export::export_report(&result, &format, &output, "rfp_report")?;

            println!(
                "\n✅ 完了 (見積 {}件 / MTO {}件)",
                result.report.pricing.len(),
                result.report.mto_requests.len()
            );
        }

        Commands::Review { input, output } => {
            println!("📝 rfp-match - 要求仕様の補完\n");
            review::run_interactive_review(&input, output.as_deref())?;
        }

        Commands::Config { show, set_catalog, set_test_prices, set_quantity } => {
            let mut config = config;

            if let Some(path) = set_catalog {
                config.set_catalog(path)?;
                println!("✔ SKUマスタを設定しました");
            }

            if let Some(path) = set_test_prices {
                config.set_test_prices(path)?;
                println!("✔ 試験価格表を設定しました");
            }

            if let Some(quantity) = set_quantity {
                config.set_quantity(quantity)?;
                println!("✔ 数量を設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  SKUマスタ: {}", config.catalog_path.display());
                println!("  試験価格表: {}", config.test_prices_path.display());
                println!("  RFPフォルダ: {}", config.rfp_folder.display());
                println!("  数量: {} km", config.quantity_km);
                println!("  対象期限: {}日", config.horizon_days);
                println!("  比較SKU数: {}", config.top_n);
                println!("  MTO上乗せ率: {}%", (config.mto_premium * Decimal::ONE_HUNDRED).normalize());
                println!("  セクション開始: {}", config.section_keywords.starts.join(", "));
                println!("  セクション終了: {}", config.section_keywords.ends.join(", "));
            }
        }
    }

    Ok(())
}
