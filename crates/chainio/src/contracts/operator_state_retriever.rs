use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc, abi)]
    interface IOperatorStateRetriever {
        struct Operator {
            address operator;
            bytes32 operatorId;
            uint96 stake;
        }

        struct CheckSignaturesIndices {
            uint32[] nonSignerQuorumBitmapIndices;
            uint32[] quorumApkIndices;
            uint32[] totalStakeIndices;
            uint32[][] nonSignerStakeIndices;
        }

        /**
         * @notice returns the ordered list of operators (id and stake) for each quorum.
         * @param registryCoordinator is the registry coordinator to fetch the AVS registry information from
         * @param quorumNumbers are the ids of the quorums to get the operator state for
         * @param blockNumber is the block number to get the operator state for
         * @return 2d array of Operators. For each quorum, an ordered list of Operators
         */
        function getOperatorState(
            address registryCoordinator,
            bytes memory quorumNumbers,
            uint32 blockNumber
        ) external view returns (Operator[][] memory);

        /**
         * @notice This function is intended to to be called by AVS operators every time a new task is created (i.e.)
         * the AVS coordinator makes a request to AVS operators.
         * @param registryCoordinator is the registry coordinator to fetch the AVS registry information from
         * @param operatorId the id of the operator to fetch the quorums lists
         * @param blockNumber is the block number to get the operator state for
         * @return 1) the quorumBitmap of the operator at the given blockNumber
         *         2) 2d array of Operator structs. For each quorum the provided operator
         *            was a part of at `blockNumber`, an ordered list of operators.
         */
        function getOperatorState(
            address registryCoordinator,
            bytes32 operatorId,
            uint32 blockNumber
        ) external view returns (uint256, Operator[][] memory);

        /**
         * @notice this is called by the AVS operator to get the relevant indices for the checkSignatures function
         * if they are not running an indexer
         * @param registryCoordinator is the registry coordinator to fetch the AVS registry information from
         * @param referenceBlockNumber is the block number to get the indices for
         * @param quorumNumbers are the ids of the quorums to get the operator state for
         * @param nonSignerOperatorIds are the ids of the nonsigning operators
         */
        function getCheckSignaturesIndices(
            address registryCoordinator,
            uint32 referenceBlockNumber,
            bytes calldata quorumNumbers,
            bytes32[] calldata nonSignerOperatorIds
        ) external view returns (CheckSignaturesIndices memory);
    }
}
