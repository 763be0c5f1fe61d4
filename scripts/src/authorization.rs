//! Granting the trigger permission to drive the controller

use alloy::{primitives::Address, sol_types::SolCall};
use tracing::info;

use crate::{
    client::ChainClient,
    errors::ScriptError,
    solidity::SentinelAMM::{automationTriggerCall, setAutomationTriggerCall},
};

/// Authorize `trigger` on `controller` and block until the call confirms.
///
/// The controller's authorized caller is read back afterwards; a confirmed
/// call that did not take effect is still an [`ScriptError::Authorization`].
pub async fn authorize_trigger<C: ChainClient>(
    client: &C,
    controller: Address,
    trigger: Address,
) -> Result<(), ScriptError> {
    let calldata = setAutomationTriggerCall { trigger }.abi_encode();

    info!(controller = %controller, trigger = %trigger, "authorizing trigger");
    let tx_hash = client
        .submit_call(controller, calldata.into())
        .await
        .map_err(|e| ScriptError::Authorization(format!("submitting authorization: {}", e)))?;

    let confirmation = client.await_confirmation(tx_hash).await.map_err(|e| {
        ScriptError::Authorization(format!("authorization {} did not confirm: {}", tx_hash, e))
    })?;
    if !confirmation.success {
        return Err(ScriptError::Authorization(format!(
            "authorization {} reverted",
            tx_hash
        )));
    }

    let authorized = authorized_trigger(client, controller).await?;
    if authorized != trigger {
        return Err(ScriptError::Authorization(format!(
            "controller reports authorized trigger {}, expected {}",
            authorized, trigger
        )));
    }

    info!(tx_hash = %tx_hash, block = ?confirmation.block_number, "trigger authorized");
    Ok(())
}

/// Read the controller's authorized trigger
pub async fn authorized_trigger<C: ChainClient>(
    client: &C,
    controller: Address,
) -> Result<Address, ScriptError> {
    let ret = client
        .call(controller, automationTriggerCall {}.abi_encode().into())
        .await
        .map_err(|e| ScriptError::Authorization(format!("reading authorized trigger: {}", e)))?;

    automationTriggerCall::abi_decode_returns(&ret)
        .map_err(|e| ScriptError::Authorization(format!("decoding authorized trigger: {}", e)))
}
