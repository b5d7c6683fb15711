// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use listwatch::application::use_cases::watch_use_case::WatchUseCase;
use listwatch::config::settings::Settings;
use listwatch::domain::services::blocklist::BlockedDomainFilter;
use listwatch::domain::services::notification_service::NotificationDispatcher;
use listwatch::engines::factory::create_record_source;
use listwatch::infrastructure::services::create_gateway;
use listwatch::infrastructure::storage::create_file_stores;
use listwatch::utils::telemetry;
use std::sync::Arc;
use tracing::{error, info};

/// 主函数
///
/// 加载配置、构建流水线并执行一次运行，调度由外部负责
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting listwatch...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Build collaborators
    let (seen_store, snapshot_store) = create_file_stores(&settings.storage);
    let gateway = create_gateway(&settings.notifier);
    let source = create_record_source(&settings)?;
    let blocklist = BlockedDomainFilter::new(&settings.blocklist.domains);
    info!(
        "Using {} gateway, {} blocked domains",
        gateway.name(),
        blocklist.len()
    );

    let mut use_case = WatchUseCase::new(
        source,
        blocklist,
        Arc::new(seen_store),
        Arc::new(snapshot_store),
        NotificationDispatcher::new(gateway, settings.notifier.budget),
    );

    // 4. Run once
    match use_case.run(settings.run.mode).await {
        Ok(report) => {
            info!("Run report: {:?}", report);
            Ok(())
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            Err(e.into())
        }
    }
}
