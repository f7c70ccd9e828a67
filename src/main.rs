use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use gacha_backend::{
    AppError,
    config::Config,
    models::{ApiResponse, DrawOutcome},
    services::*,
    utils::PaginationParams,
};

fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // 加载配置
    let config = Config::from_toml().inspect_err(|e| e.log())?;

    // 目录与账户存储
    let catalog = InMemoryCatalog::new(config.rewards.clone()).inspect_err(|e| e.log())?;
    if catalog.is_empty() {
        log::warn!("Reward catalog is empty, every draw will fail");
    } else {
        log::info!("Reward catalog ready with {} rewards", catalog.len());
    }
    let store = InMemoryAccountStore::new();

    // 创建服务
    let gacha_service = GachaService::from_config(catalog.clone(), store.clone(), &config.gacha)?;
    let shop_service = ShopService::new(catalog.clone(), store.clone())
        .with_max_attempts(config.gacha.max_attempts);
    let ranking_service = RankingService::new(store.clone());
    let profile_service = ProfileService::new(catalog.clone(), store.clone());

    log::info!(
        "Starting gacha session: {} accounts, {} draws each, cost {}",
        config.session.accounts,
        config.session.draws_per_account,
        gacha_service.draw_cost()
    );

    let mut account_ids = Vec::new();
    for i in 1..=config.session.accounts {
        let account = store
            .create_account(&format!("player-{i}"), config.session.initial_balance)
            .await?;
        account_ids.push(account.id);
    }

    for account_id in &account_ids {
        for _ in 0..config.session.draws_per_account {
            match gacha_service.draw(account_id).await {
                Ok(DrawOutcome::PoolExhausted { .. }) => break,
                Ok(outcome) => {
                    println!("{}", serde_json::to_string(&ApiResponse::success(outcome))?)
                }
                Err(e @ AppError::InsufficientBalance { .. }) => {
                    e.log();
                    break;
                }
                Err(e) => {
                    e.log();
                    println!("{}", e.to_json());
                    return Err(e.into());
                }
            }
        }

        // 剩余余额尝试购买最便宜的商店奖励
        let cheapest = shop_service
            .list_items(None)
            .into_iter()
            .min_by_key(|item| item.price);
        if let Some(item) = cheapest {
            match shop_service.purchase(account_id, &item.reward.id).await {
                Ok(receipt) => {
                    println!("{}", serde_json::to_string(&ApiResponse::success(receipt))?)
                }
                Err(e) => e.log(),
            }
        }
    }

    for account_id in &account_ids {
        let profile = profile_service.profile(account_id).await?;
        println!("{}", serde_json::to_string(&ApiResponse::success(profile))?);
    }

    let leaderboard = ranking_service
        .leaderboard(&PaginationParams::default())
        .await?;
    println!(
        "{}",
        serde_json::to_string(&ApiResponse::success_with_message(
            leaderboard,
            "Collection leaderboard".to_string()
        ))?
    );

    Ok(())
}
