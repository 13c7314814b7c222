mod entitlement;
mod ledger;
mod purchase;
mod sequence;
mod subscription;
