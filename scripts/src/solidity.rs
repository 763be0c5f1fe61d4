//! Definitions of Solidity constructors and functions called during deployment

use alloy::sol;

sol! {
    contract SentinelAMM {
        constructor(
            address factory,
            address positionManager,
            address token0,
            address token1,
            uint24 fee,
            address owner,
            uint256 rangeWidthMultiplier,
            address priceFeed
        );

        function setAutomationTrigger(address trigger) external;

        function automationTrigger() external view returns (address);
    }

    contract AutomationTrigger {
        constructor(address sentinel);
    }

    contract MockV3Aggregator {
        constructor(uint8 decimals, int256 initialAnswer);
    }
}
