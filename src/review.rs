//! 対話式の要求仕様補完・RFP選択
//!
//! 抽出で埋まらなかった項目を担当者が入力し、照合前に要求仕様を補う。

use crate::error::{Result, RfpMatchError};
use crate::scanner::RfpDocument;
use chrono::NaiveDate;
use dialoguer::{Input, MultiSelect};
use rfp_match_common::{Armoured, MatchField, RequirementSet};
use std::path::Path;

/// 対話アクション
pub enum ReviewAction {
    /// 値を入力
    Set(String),
    /// 未設定のまま次へ
    Skip,
    /// 保存して終了
    Quit,
}

/// 入力値を項目に設定する（解釈できなければエラーメッセージを返す）
pub fn apply_answer(
    requirements: &mut RequirementSet,
    field: MatchField,
    answer: &str,
) -> std::result::Result<(), String> {
    let answer = answer.trim();

    match field {
        MatchField::Voltage => {
            let number = answer
                .trim_end_matches(|c: char| c.is_ascii_alphabetic())
                .trim();
            let value: f64 = number
                .parse()
                .map_err(|_| format!("電圧は数値で入力してください: {}", answer))?;
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("電圧は正の数で入力してください: {}", answer));
            }
            requirements.voltage_kv = Some(value);
        }
        MatchField::Conductor => requirements.conductor = Some(answer.to_string()),
        MatchField::Insulation => requirements.insulation = Some(answer.to_string()),
        MatchField::Cores => {
            let value: u32 = answer
                .parse()
                .map_err(|_| format!("心線数は整数で入力してください: {}", answer))?;
            if value == 0 {
                return Err("心線数は1以上で入力してください".to_string());
            }
            requirements.cores = Some(value);
        }
        MatchField::Armoured => match Armoured::parse(answer) {
            Armoured::Unknown => return Err(format!("Yes / No で入力してください: {}", answer)),
            known => requirements.armoured = known,
        },
    }

    Ok(())
}

/// 対話式で要求仕様を補完
pub fn run_interactive_review(input_path: &Path, output_path: Option<&Path>) -> Result<()> {
    if !input_path.exists() {
        return Err(RfpMatchError::FileNotFound(input_path.display().to_string()));
    }

    let content = std::fs::read_to_string(input_path)?;
    let mut requirements: RequirementSet = serde_json::from_str(&content)?;

    let missing = requirements.missing_fields();
    if missing.is_empty() {
        println!("✓ すべての項目が設定されています");
        return Ok(());
    }

    println!("📝 未設定の項目: {}件", missing.len());
    println!("---");
    println!("操作: [Enter]未設定のまま [q]保存して終了");
    println!("---\n");

    'fields: for (count, &field) in missing.iter().enumerate() {
        println!("[{}/{}] {}", count + 1, missing.len(), field.label());

        loop {
            match prompt_review_action(field)? {
                ReviewAction::Set(answer) => match apply_answer(&mut requirements, field, &answer) {
                    Ok(()) => {
                        let value = requirements.value_text(field).unwrap_or_default();
                        println!("  → {}\n", value);
                        break;
                    }
                    Err(message) => println!("  ✗ {}", message),
                },
                ReviewAction::Skip => {
                    println!("  → 未設定\n");
                    break;
                }
                ReviewAction::Quit => {
                    println!("保存して終了します...");
                    break 'fields;
                }
            }
        }
    }

    let output = output_path.unwrap_or(input_path);
    let json = serde_json::to_string_pretty(&requirements)?;
    std::fs::write(output, json)?;

    println!("\n✓ 保存しました: {}", output.display());

    Ok(())
}

fn prompt_review_action(field: MatchField) -> Result<ReviewAction> {
    let hint = match field {
        MatchField::Voltage => "例: 11",
        MatchField::Conductor => "例: Aluminium",
        MatchField::Insulation => "例: XLPE",
        MatchField::Cores => "例: 3",
        MatchField::Armoured => "Yes / No",
    };

    let input: String = Input::new()
        .with_prompt(format!("  {} ({}, q:終了)", field.label(), hint))
        .allow_empty(true)
        .interact_text()
        .map_err(|e| RfpMatchError::Prompt(e.to_string()))?;

    match input.trim() {
        "" => Ok(ReviewAction::Skip),
        "q" | "Q" => Ok(ReviewAction::Quit),
        value => Ok(ReviewAction::Set(value.to_string())),
    }
}

/// 処理するRFPを対話式で選ぶ（初期状態は全選択）
pub fn select_rfps_interactive(rfps: &[RfpDocument], today: NaiveDate) -> Result<Vec<RfpDocument>> {
    if rfps.is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<String> = rfps
        .iter()
        .map(|r| {
            let due = r
                .meta
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let left = r
                .days_left(today)
                .map(|d| format!("残り{}日", d))
                .unwrap_or_default();
            format!("{} [{}] 期限 {} {}", r.meta.rfp_id, r.source, due, left)
        })
        .collect();
    let defaults = vec![true; items.len()];

    let chosen = MultiSelect::new()
        .with_prompt("処理するRFPを選択 (Space:切替 Enter:確定)")
        .items(&items)
        .defaults(&defaults)
        .interact()
        .map_err(|e| RfpMatchError::Prompt(e.to_string()))?;

    Ok(chosen.into_iter().map(|i| rfps[i].clone()).collect())
}
