mod composite;
