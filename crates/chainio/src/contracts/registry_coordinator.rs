use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc, abi)]
    interface IRegistryCoordinator {
        /**
         * @notice Emitted when an operator's socket is updated.
         * @param operatorId the operator's id
         * @param socket the new socket
         */
        event OperatorSocketUpdate(bytes32 indexed operatorId, string socket);

        /// @notice Returns the number of quorums the registry coordinator has created
        function quorumCount() external view returns (uint8);

        /// @notice Returns the current quorum bitmap for the given `operatorId` or 0 if the operator is not registered for any quorum
        function getCurrentQuorumBitmap(bytes32 operatorId) external view returns (uint192);

        /// @notice Returns the operatorId for the given `operator`
        function getOperatorId(address operator) external view returns (bytes32);

        /// @notice Returns the operator address for the given `operatorId`
        function getOperatorFromId(bytes32 operatorId) external view returns (address);

        /// @notice Returns the status for the given `operator`, 1 meaning registered
        function getOperatorStatus(address operator) external view returns (uint8);
    }
}
