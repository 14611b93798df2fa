use ledger_gateway_sdk_rs::{ConnectionProfile, Contract, FileSystemWallet, Gateway, GatewayOptions};
use tracing::info;

use crate::console::{ask_yes_no, confirmed_name, Console};
use crate::types::{ClientConfig, ClientError};

pub use identity::{ensure_identity, CredentialSource};

mod identity;

/// Everything the command loop needs: the open gateway, the resolved contract and who is acting.
pub struct Session {
    pub gateway: Gateway,
    pub contract: Contract,
    pub user_label: String,
}

/// Startup wizard: discovery mode, wallet and identity, gateway, channel and contract.
pub async fn establish<C: Console>(console: &mut C, config: &ClientConfig) -> Result<Session, ClientError> {
    info!("============ setting DISCOVERY_AS_LOCALHOST ============");
    let discovery_as_localhost = ask_yes_no(console, "-> Do you want to set DISCOVERY_AS_LOCALHOST to true? [y/n]: ")?;
    info!("-> DISCOVERY_AS_LOCALHOST is {}", discovery_as_localhost);

    info!("============ Creating wallet ============");
    let wallet = FileSystemWallet::new(config.wallet_path())?;
    info!("============ Wallet created ============");

    let user_label = confirmed_name(console, "username", FileSystemWallet::is_valid_label)?;
    info!("-> Your username is {}.", user_label);
    ensure_identity(&wallet, &user_label, &CredentialSource::from(config))?;

    let profile = ConnectionProfile::from_file(&config.connection_profile())?;
    let options = GatewayOptions {
        discovery_as_localhost,
        connect_timeout: config.connect_timeout(),
        keystore_path: config.keystore_path(),
    };

    info!("============ connecting to gateway ============");
    let gateway = Gateway::connect(&profile, &wallet, &user_label, options).await?;
    info!("============ Successfully connected to gateway ============");

    match open_contract(console, &gateway).await {
        Ok(contract) => Ok(Session {
            gateway,
            contract,
            user_label,
        }),
        Err(error) => {
            gateway.close().await;
            Err(error)
        }
    }
}

async fn open_contract<C: Console>(console: &mut C, gateway: &Gateway) -> Result<Contract, ClientError> {
    info!("============ connecting to network ============");
    let channel_name = confirmed_name(console, "network name", is_present)?;
    let network = gateway.get_network(&channel_name).await?;
    info!("============ successfully connected to network {} ============", network.name());

    info!("============ getting contract ============");
    let contract_name = confirmed_name(console, "contract name", is_present)?;
    let contract = network.get_contract(&contract_name);
    info!("============ successfully got contract {} ============", contract.name());

    Ok(contract)
}

fn is_present(name: &str) -> bool {
    !name.trim().is_empty()
}
