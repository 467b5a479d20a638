use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc, abi)]
    interface IStakeRegistry {
        /// @notice Returns the most recent stake weight for the `operatorId` for quorum `quorumNumber`
        function getCurrentStake(bytes32 operatorId, uint8 quorumNumber) external view returns (uint96);
    }
}
