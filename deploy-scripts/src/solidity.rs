//! Definitions of the Solidity interfaces called during and after deployment

use alloy::sol;

sol! {
    /// The token contract
    #[sol(rpc)]
    interface Balloons {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// The exchange contract, constructed with the token's address
    #[sol(rpc)]
    interface Dex {
        function totalLiquidity() external view returns (uint256);
        function liquidity(address lp) external view returns (uint256);
        function init(uint256 tokens) external payable returns (uint256);
    }
}
